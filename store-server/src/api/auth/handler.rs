//! Authentication Handlers
//!
//! Handles registration, login, and the password-reset flow

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode};
use shared::client::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest,
    UserInfo,
};
use shared::error::{ApiResponse, AppError, ErrorCode};

use crate::auth::{CurrentUser, generate_reset_token, reset_token_expiry};
use crate::core::ServerState;
use crate::db::models::{User, UserRole};
use crate::db::repository::UserRepository;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_NAME_LEN, validate_email, validate_password, validate_required_text};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

fn user_info(user: &User) -> UserInfo {
    UserInfo {
        id: user.id_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.to_string(),
    }
}

/// Register handler
///
/// Creates a new account; the unique email index rejects duplicates.
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserInfo>)> {
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let role = match req.role.as_deref() {
        Some(r) => r.parse::<UserRole>()?,
        None => UserRole::User,
    };

    let hash_pass = User::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let repo = UserRepository::new(state.db.clone());
    let user = match repo.create(req.name, req.email, hash_pass, role).await {
        Ok(user) => user,
        Err(crate::db::repository::RepoError::Duplicate(_)) => {
            return Err(AppError::new(ErrorCode::EmailExists));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        user_id = %user.id_string(),
        email = %user.email,
        role = %user.role,
        "User registered"
    );

    Ok((StatusCode::CREATED, Json(user_info(&user))))
}

/// Login handler
///
/// Authenticates credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo.find_by_email(&req.email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent email enumeration
    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

            if !password_valid {
                tracing::warn!(email = %req.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(email = %req.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .jwt_service()
        .generate_token(&user.id_string(), &user.name, &user.email, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = %user.id_string(),
        email = %user.email,
        role = %user.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        role: user.role.to_string(),
        user: user_info(&user),
    }))
}

/// Get current user info
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UserInfo>> {
    // Query fresh user data; fall back to claims if the record vanished
    let repo = UserRepository::new(state.db.clone());
    let info = match repo.find_by_id(&user.id).await? {
        Some(fresh) => user_info(&fresh),
        None => UserInfo {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
        },
    };
    Ok(Json(info))
}

/// Forgot-password handler
///
/// Issues a single-use reset token with a 1-hour expiry. The response is
/// identical whether or not the email exists, and the token is only ever
/// delivered out of band (email collaborator), never in the response body.
pub async fn forgot_password(
    State(state): State<ServerState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate_email(&req.email)?;

    let repo = UserRepository::new(state.db.clone());
    if let Some(user) = repo.find_by_email(&req.email).await? {
        let token = generate_reset_token()?;
        let expires_at = reset_token_expiry();
        repo.set_reset_token(&user.id_string(), token, expires_at).await?;

        tracing::info!(user_id = %user.id_string(), "Password reset token issued");
    } else {
        tracing::warn!(email = %req.email, "Password reset requested for unknown email");
    }

    Ok(Json(ApiResponse::success_with_message(
        "Password reset instructions have been sent to your email",
        (),
    )))
}

/// Reset-password handler
///
/// Accepts a stored, unexpired token exactly once; token fields are cleared
/// on success.
pub async fn reset_password(
    State(state): State<ServerState>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate_required_text(&req.token, "token", 128)?;
    validate_password(&req.new_password)?;

    let now = chrono::Utc::now().timestamp_millis();
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_reset_token(&req.token, now)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ResetTokenInvalid))?;

    let hash_pass = User::hash_password(&req.new_password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
    repo.reset_password(&user.id_string(), hash_pass).await?;

    tracing::info!(user_id = %user.id_string(), "Password has been reset");

    Ok(Json(ApiResponse::success_with_message(
        "Password has been reset successfully",
        (),
    )))
}
