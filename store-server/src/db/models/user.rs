//! User Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use surrealdb::RecordId;

pub type UserId = RecordId;

/// Account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Staff,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = shared::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "user" => Ok(Self::User),
            other => Err(shared::error::AppError::new(shared::error::ErrorCode::InvalidRole)
                .with_detail("role", other)),
        }
    }
}

/// User model
///
/// 密码散列与重置令牌永远不序列化到 API 响应。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub role: UserRole,
    /// Password reset token (none → issued → consumed)
    #[serde(default, skip_serializing)]
    pub reset_token: Option<String>,
    /// Reset token expiry (unix ms)
    #[serde(default, skip_serializing)]
    pub reset_token_expires: Option<i64>,
    #[serde(default)]
    pub created_at: i64,
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// User id as "user:xxx" string (empty if unset)
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = User::hash_password("hunter42").unwrap();
        let user = User {
            id: None,
            name: "Test".into(),
            email: "t@example.com".into(),
            hash_pass: hash,
            role: UserRole::Staff,
            reset_token: None,
            reset_token_expires: None,
            created_at: 0,
        };
        assert!(user.verify_password("hunter42").unwrap());
        assert!(!user.verify_password("wrong").unwrap());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("staff".parse::<UserRole>().unwrap(), UserRole::Staff);
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_sensitive_fields_not_serialized() {
        let user = User {
            id: None,
            name: "Test".into(),
            email: "t@example.com".into(),
            hash_pass: "secret-hash".into(),
            role: UserRole::User,
            reset_token: Some("abc".into()),
            reset_token_expires: Some(123),
            created_at: 0,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("reset_token"));
    }
}
