//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::client::{CheckoutRequest, PurchasedResponse};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::OrderRepository;
use crate::utils::AppResult;

/// POST /api/orders - 结账
///
/// 服务端编排：逐行扣减库存，失败回补，成功后写入订单快照。
/// 订单号/交易号均由服务端生成。
pub async fn checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.checkout_service().checkout(req, &user).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders - 订单列表 (新→旧)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_all().await?;
    Ok(Json(orders))
}

/// GET /api/orders/purchased/:product_id - 当前用户是否购买过该商品
///
/// 基于订单条目里的商品 id 判断，商品改名不影响结果。
pub async fn purchased(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(product_id): Path<String>,
) -> AppResult<Json<PurchasedResponse>> {
    let repo = OrderRepository::new(state.db.clone());
    let purchased = repo.has_purchased(&user.email, &product_id).await?;
    Ok(Json(PurchasedResponse { purchased }))
}
