//! Inventory Adjustment Service
//!
//! 售出扣减的约束：仅当现有库存足够时才扣减，并在同一事务内追加一条
//! `sell` 流水。条件检查、扣减、流水写入全部落在一个 SurrealDB 事务里，
//! 并发售出在存储引擎处串行化，两个同时到达的请求不可能同时基于同一个
//! 扣减前数量成功。

use shared::error::{AppError, ErrorCode};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::CurrentUser;
use crate::db::models::{LedgerAction, LedgerEntry, Product, ProductSnapshot};
use crate::db::repository::{LedgerRepository, ProductRepository, parse_id};
use crate::utils::AppResult;

/// 售出事务：检查库存 → 扣减 → 写流水，原子执行
///
/// `THROW` 中止整个事务，库存和流水都不会落盘。
const SELL_QUERY: &str = r#"
BEGIN TRANSACTION;
LET $product = (SELECT * FROM ONLY $target);
IF $product == NONE { THROW "PRODUCT_NOT_FOUND" };
IF $product.quantity < $qty { THROW "INSUFFICIENT_STOCK" };
UPDATE $target SET quantity -= $qty, updated_at = $now;
CREATE ledger_entry CONTENT {
    product_id: <string> $product.id,
    product_name: $product.name,
    quantity_sold: $qty,
    staff_name: $staff_name,
    staff_role: $staff_role,
    action: 'sell',
    created_at: $now
};
COMMIT TRANSACTION;
"#;

/// 回补事务：结账补偿专用，同样在一个事务内回加库存并写 `restock` 流水
const RESTOCK_QUERY: &str = r#"
BEGIN TRANSACTION;
LET $product = (SELECT * FROM ONLY $target);
IF $product == NONE { THROW "PRODUCT_NOT_FOUND" };
UPDATE $target SET quantity += $qty, updated_at = $now;
CREATE ledger_entry CONTENT {
    product_id: <string> $product.id,
    product_name: $product.name,
    quantity_sold: $qty,
    staff_name: $staff_name,
    staff_role: $staff_role,
    action: 'restock',
    created_at: $now
};
COMMIT TRANSACTION;
"#;

/// Inventory adjustment service
#[derive(Clone)]
pub struct InventoryService {
    db: Surreal<Db>,
}

impl InventoryService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Sell: decrement stock by `quantity` iff sufficient stock exists
    ///
    /// On success returns the updated product; exactly one `sell` ledger
    /// entry is appended. On failure stock and ledger are both untouched.
    pub async fn sell(
        &self,
        product_id: &str,
        quantity: i64,
        actor: &CurrentUser,
    ) -> AppResult<Product> {
        if quantity <= 0 {
            return Err(AppError::new(ErrorCode::InvalidQuantity).with_detail("quantity", quantity));
        }

        // 友好错误的快速路径检查；真正的一致性由事务内的条件保证
        let repo = ProductRepository::new(self.db.clone());
        let product = repo
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| Self::product_not_found(product_id))?;
        if product.quantity < quantity {
            return Err(AppError::insufficient_stock(
                product_id,
                quantity,
                product.quantity,
            ));
        }

        let updated = self
            .run_adjustment(SELL_QUERY, product_id, quantity, actor)
            .await?;

        tracing::info!(
            product_id = %product_id,
            quantity = quantity,
            staff = %actor.name,
            role = %actor.role,
            "Stock sold"
        );

        Ok(updated)
    }

    /// Restock: add stock back (checkout saga compensation only)
    pub async fn restock(
        &self,
        product_id: &str,
        quantity: i64,
        actor: &CurrentUser,
    ) -> AppResult<Product> {
        if quantity <= 0 {
            return Err(AppError::new(ErrorCode::InvalidQuantity).with_detail("quantity", quantity));
        }

        let updated = self
            .run_adjustment(RESTOCK_QUERY, product_id, quantity, actor)
            .await?;

        tracing::warn!(
            product_id = %product_id,
            quantity = quantity,
            staff = %actor.name,
            "Stock restored by checkout compensation"
        );

        Ok(updated)
    }

    /// Append an `add` ledger entry for a newly created product
    pub async fn record_add(&self, product: &Product, actor: &CurrentUser) -> AppResult<()> {
        let entry = LedgerEntry {
            id: None,
            product_id: product.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            product_name: product.name.clone(),
            quantity_sold: product.quantity,
            staff_name: actor.name.clone(),
            staff_role: actor.role.to_string(),
            action: LedgerAction::Add,
            before: None,
            after: None,
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        LedgerRepository::new(self.db.clone()).append(entry).await?;
        Ok(())
    }

    /// Append an `update` ledger entry with before/after snapshots
    pub async fn record_update(
        &self,
        before: &Product,
        after: &Product,
        actor: &CurrentUser,
    ) -> AppResult<()> {
        let entry = LedgerEntry {
            id: None,
            product_id: after.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            product_name: after.name.clone(),
            quantity_sold: 0,
            staff_name: actor.name.clone(),
            staff_role: actor.role.to_string(),
            action: LedgerAction::Update,
            before: Some(ProductSnapshot {
                name: before.name.clone(),
                price: before.price,
                quantity: before.quantity,
            }),
            after: Some(ProductSnapshot {
                name: after.name.clone(),
                price: after.price,
                quantity: after.quantity,
            }),
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        LedgerRepository::new(self.db.clone()).append(entry).await?;
        Ok(())
    }

    /// Run one of the adjustment transactions, then fetch the updated product
    async fn run_adjustment(
        &self,
        query: &str,
        product_id: &str,
        quantity: i64,
        actor: &CurrentUser,
    ) -> AppResult<Product> {
        let target = parse_id("product", product_id).map_err(AppError::from)?;
        let now = chrono::Utc::now().timestamp_millis();

        let response = self
            .db
            .query(query)
            .bind(("target", target))
            .bind(("qty", quantity))
            .bind(("now", now))
            .bind(("staff_name", actor.name.clone()))
            .bind(("staff_role", actor.role.to_string()))
            .await
            .map_err(|e| Self::map_adjustment_error(e, product_id, quantity))?;

        // THROW aborts the whole transaction and surfaces here
        response
            .check()
            .map_err(|e| Self::map_adjustment_error(e, product_id, quantity))?;

        ProductRepository::new(self.db.clone())
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| Self::product_not_found(product_id))
    }

    /// Map THROWn transaction errors to domain errors
    fn map_adjustment_error(err: surrealdb::Error, product_id: &str, quantity: i64) -> AppError {
        let msg = err.to_string();
        if msg.contains("INSUFFICIENT_STOCK") {
            AppError::new(ErrorCode::InsufficientStock)
                .with_detail("product", product_id)
                .with_detail("requested", quantity)
        } else if msg.contains("PRODUCT_NOT_FOUND") {
            Self::product_not_found(product_id)
        } else {
            AppError::database(msg)
        }
    }

    fn product_not_found(product_id: &str) -> AppError {
        AppError::new(ErrorCode::ProductNotFound).with_detail("product", product_id)
    }
}
