//! 密码重置令牌
//!
//! 令牌状态机: `none → issued(expires_at) → consumed(none)`，
//! 或 `issued → expired(none)` 过期后未使用。
//!
//! 令牌为 20 字节安全随机数的 hex 编码，固定 1 小时有效期，单次使用
//! （重置成功后由仓储清除）。

use chrono::{Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use shared::error::AppError;

/// 重置令牌有效期（分钟）
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// 令牌原始字节数（hex 后为 40 字符）
const RESET_TOKEN_BYTES: usize = 20;

/// 生成一个新的重置令牌
pub fn generate_reset_token() -> Result<String, AppError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rng.fill(&mut bytes)
        .map_err(|_| AppError::internal("Failed to generate reset token"))?;
    Ok(hex::encode(bytes))
}

/// 从当前时间计算令牌过期时间戳（unix 毫秒）
pub fn reset_token_expiry() -> i64 {
    (Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES)).timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_reset_token().unwrap();
        assert_eq!(token.len(), RESET_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_unique() {
        let a = generate_reset_token().unwrap();
        let b = generate_reset_token().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_expiry_in_future() {
        let expiry = reset_token_expiry();
        assert!(expiry > Utc::now().timestamp_millis());
    }
}
