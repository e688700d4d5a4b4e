//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口 (注册/登录/密码重置)
//! - [`products`] - 商品管理与售出接口
//! - [`orders`] - 结账与订单查询接口
//! - [`ledger`] - 库存流水查询接口 (仅管理员)
//! - [`upload`] - 商品图片上传接口

pub mod auth;
pub mod health;
pub mod ledger;
pub mod orders;
pub mod products;
pub mod upload;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// Build the full application router with middleware layers
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(ledger::router())
        .merge(upload::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
