//! Ledger API Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::core::ServerState;
use crate::db::models::{LedgerListResponse, LedgerQuery};
use crate::db::repository::LedgerRepository;
use crate::utils::AppResult;

/// 单页最大条数
const MAX_PAGE_SIZE: usize = 500;

/// GET /api/ledger - 流水列表 (新→旧，可按 action / product_id 过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(mut query): Query<LedgerQuery>,
) -> AppResult<Json<LedgerListResponse>> {
    query.limit = query.limit.clamp(1, MAX_PAGE_SIZE);

    let repo = LedgerRepository::new(state.db.clone());
    let (items, total) = repo.list(query).await?;

    Ok(Json(LedgerListResponse { items, total }))
}
