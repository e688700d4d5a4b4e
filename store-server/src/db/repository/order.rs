//! Order Repository
//!
//! Orders are written once at checkout and read-only thereafter.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Order;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create the order record
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let order_number = order.order_number.clone();
        let result = self.base.db().create(ORDER_TABLE).content(order).await;

        // order_number carries a unique index; a collision is rejected,
        // not deduplicated
        let created: Option<Order> = match result {
            Ok(c) => c,
            Err(e) if e.to_string().contains("order_number_idx") => {
                return Err(RepoError::Duplicate(format!(
                    "Order number '{}' already exists",
                    order_number
                )));
            }
            Err(e) => return Err(e.into()),
        };

        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// All orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Id-based purchase check: has this email ever bought this product?
    pub async fn has_purchased(&self, email: &str, product_id: &str) -> RepoResult<bool> {
        #[derive(serde::Deserialize)]
        struct CountRow {
            total: u64,
        }

        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() AS total FROM order WHERE email = $email AND items.product_id CONTAINS $product_id GROUP ALL",
            )
            .bind(("email", email.to_string()))
            .bind(("product_id", product_id.to_string()))
            .await?;
        let counts: Vec<CountRow> = result.take(0)?;
        Ok(counts.first().map(|c| c.total).unwrap_or(0) > 0)
    }
}
