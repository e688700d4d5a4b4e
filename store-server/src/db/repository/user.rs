//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{User, UserRole};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let record_id = parse_id(USER_TABLE, id)?;
        let user: Option<User> = self.base.db().select(record_id).await?;
        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    ///
    /// email 唯一性由 user_email_idx 唯一索引兜底；预检查只是为了
    /// 给出友好的错误，真正的并发冲突由索引拒绝。
    pub async fn create(
        &self,
        name: String,
        email: String,
        hash_pass: String,
        role: UserRole,
    ) -> RepoResult<User> {
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already registered",
                email
            )));
        }

        let result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    name = $name,
                    email = $email,
                    hash_pass = $hash_pass,
                    role = $role,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("name", name))
            .bind(("email", email.clone()))
            .bind(("hash_pass", hash_pass))
            .bind(("role", role))
            .bind(("created_at", chrono::Utc::now().timestamp_millis()))
            .await;

        // The unique index rejects a concurrent duplicate between the
        // pre-check and the CREATE
        let mut result = match result {
            Ok(r) => r,
            Err(e) if e.to_string().contains("user_email_idx") => {
                return Err(RepoError::Duplicate(format!(
                    "Email '{}' already registered",
                    email
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let created: Option<User> = result.take(0).map_err(|e| {
            if e.to_string().contains("user_email_idx") {
                RepoError::Duplicate(format!("Email '{}' already registered", email))
            } else {
                RepoError::Database(e.to_string())
            }
        })?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Store a password reset token on the user record
    pub async fn set_reset_token(
        &self,
        user_id: &str,
        token: String,
        expires_at: i64,
    ) -> RepoResult<()> {
        let record_id = parse_id(USER_TABLE, user_id)?;
        let updated: Vec<User> = self
            .base
            .db()
            .query("UPDATE $user SET reset_token = $reset_tok, reset_token_expires = $expires RETURN AFTER")
            .bind(("user", record_id))
            .bind(("reset_tok", token))
            .bind(("expires", expires_at))
            .await?
            .take(0)?;
        if updated.is_empty() {
            return Err(RepoError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    /// Find the user holding an unexpired reset token
    pub async fn find_by_reset_token(&self, token: &str, now_ms: i64) -> RepoResult<Option<User>> {
        let token_owned = token.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM user WHERE reset_token = $reset_tok AND reset_token_expires > $now LIMIT 1",
            )
            .bind(("reset_tok", token_owned))
            .bind(("now", now_ms))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Set a new password hash and clear the reset token (single use)
    pub async fn reset_password(&self, user_id: &str, hash_pass: String) -> RepoResult<()> {
        let record_id = parse_id(USER_TABLE, user_id)?;
        let updated: Vec<User> = self
            .base
            .db()
            .query(
                "UPDATE $user SET hash_pass = $hash_pass, reset_token = NONE, reset_token_expires = NONE RETURN AFTER",
            )
            .bind(("user", record_id))
            .bind(("hash_pass", hash_pass))
            .await?
            .take(0)?;
        if updated.is_empty() {
            return Err(RepoError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }
}
