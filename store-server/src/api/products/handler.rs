//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::client::SellRequest;
use shared::error::{ApiResponse, AppError, ErrorCode};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::{ProductRepository, RepoError};
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_URL_LEN, validate_discount, validate_optional_text,
    validate_price, validate_required_text, validate_stock_quantity,
};

// =============================================================================
// Product Handlers
// =============================================================================

/// GET /api/products - 获取所有商品
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_all().await?;
    Ok(Json(products))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound).with_detail("product", id))?;
    Ok(Json(product))
}

/// GET /api/products/brands - 去重后的品牌列表
pub async fn brands(State(state): State<ServerState>) -> AppResult<Json<Vec<String>>> {
    let repo = ProductRepository::new(state.db.clone());
    let brands = repo.distinct_brands().await?;
    Ok(Json(brands))
}

/// GET /api/products/by-brand/:brand - 按品牌获取商品
pub async fn list_by_brand(
    State(state): State<ServerState>,
    Path(brand): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_by_brand(&brand).await?;
    Ok(Json(products))
}

/// POST /api/products - 创建商品 (附带一条 add 流水)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<Product>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.brand, "brand", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    validate_price(payload.price)?;
    validate_stock_quantity(payload.quantity.unwrap_or(0))?;
    validate_discount(payload.discount_percentage.unwrap_or(0.0))?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo.create(payload).await?;

    // add 流水是第二笔独立写入，不与商品创建共事务
    state.inventory_service().record_add(&product, &user).await?;

    tracing::info!(
        product_id = %product.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
        name = %product.name,
        staff = %user.name,
        "Product created"
    );

    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/:id - 更新商品 (流水带修改前后快照)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(brand) = &payload.brand {
        validate_required_text(brand, "brand", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }
    if let Some(quantity) = payload.quantity {
        validate_stock_quantity(quantity)?;
    }
    if let Some(discount) = payload.discount_percentage {
        validate_discount(discount)?;
    }

    let repo = ProductRepository::new(state.db.clone());
    let before = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound).with_detail("product", id.clone()))?;

    let after = match repo.update(&id, payload).await {
        Ok(p) => p,
        Err(RepoError::NotFound(_)) => {
            return Err(AppError::new(ErrorCode::ProductNotFound).with_detail("product", id));
        }
        Err(e) => return Err(e.into()),
    };

    state
        .inventory_service()
        .record_update(&before, &after, &user)
        .await?;

    tracing::info!(
        product_id = %id,
        staff = %user.name,
        "Product updated"
    );

    Ok(Json(after))
}

/// DELETE /api/products/:id - 删除商品 (仅管理员)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !user.is_admin() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    let repo = ProductRepository::new(state.db.clone());
    match repo.delete(&id).await {
        Ok(deleted) => {
            tracing::info!(
                product_id = %id,
                name = %deleted.name,
                staff = %user.name,
                "Product deleted"
            );
            Ok(Json(ApiResponse::success_with_message("Product deleted", ())))
        }
        Err(RepoError::NotFound(_)) => {
            Err(AppError::new(ErrorCode::ProductNotFound).with_detail("product", id))
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /api/products/sell - 售出扣减库存
///
/// 条件检查、扣减与 sell 流水在库存服务的单个事务内完成。
pub async fn sell(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<SellRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state
        .inventory_service()
        .sell(&req.product_id, req.quantity, &user)
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        format!("Product sold successfully by {} ({})", user.name, user.role),
        product,
    )))
}
