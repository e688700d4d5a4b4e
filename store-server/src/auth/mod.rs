//! 认证模块
//!
//! - [`jwt`] - JWT 令牌服务与当前用户上下文
//! - [`middleware`] - 认证/管理员中间件
//! - [`extractor`] - axum 提取器
//! - [`reset`] - 密码重置令牌

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod reset;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use reset::{RESET_TOKEN_TTL_MINUTES, generate_reset_token, reset_token_expiry};
