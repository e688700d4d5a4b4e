//! Shared types for the store server and its clients
//!
//! 前后端共享的类型定义：
//!
//! - [`error`] - 统一错误码和 API 响应结构
//! - [`client`] - API 请求/响应 DTO

pub mod client;
pub mod error;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
