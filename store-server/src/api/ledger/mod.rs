//! Ledger API 模块
//!
//! 整个模块挂 require_admin：流水包含操作人与价格变动历史。

pub mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/ledger",
        Router::new()
            .route("/", get(handler::list))
            .route_layer(middleware::from_fn(require_admin)),
    )
}
