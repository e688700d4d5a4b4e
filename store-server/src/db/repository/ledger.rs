//! Ledger Repository
//!
//! Append and query only. Ledger entries are never updated or deleted.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{LedgerEntry, LedgerQuery};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const LEDGER_TABLE: &str = "ledger_entry";

#[derive(Clone)]
pub struct LedgerRepository {
    base: BaseRepository,
}

impl LedgerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append one entry
    ///
    /// 仅用于 add/update 流水；sell/restock 的流水由库存服务在
    /// 同一事务内写入。
    pub async fn append(&self, entry: LedgerEntry) -> RepoResult<LedgerEntry> {
        let created: Option<LedgerEntry> = self
            .base
            .db()
            .create(LEDGER_TABLE)
            .content(entry)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to append ledger entry".to_string()))
    }

    /// List entries, newest first, with optional filters and paging
    pub async fn list(&self, query: LedgerQuery) -> RepoResult<(Vec<LedgerEntry>, u64)> {
        let mut conditions: Vec<&str> = Vec::new();
        if query.action.is_some() {
            conditions.push("action = $action");
        }
        if query.product_id.is_some() {
            conditions.push("product_id = $product_id");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let select = format!(
            "SELECT * FROM ledger_entry{where_clause} ORDER BY created_at DESC LIMIT {} START {}",
            query.limit, query.offset
        );
        let count = format!("SELECT count() AS total FROM ledger_entry{where_clause} GROUP ALL");

        let mut q = self.base.db().query(&select).query(&count);
        if let Some(action) = query.action {
            q = q.bind(("action", action));
        }
        if let Some(product_id) = query.product_id {
            q = q.bind(("product_id", product_id));
        }

        let mut result = q.await?;
        let items: Vec<LedgerEntry> = result.take(0)?;

        #[derive(serde::Deserialize)]
        struct CountRow {
            total: u64,
        }
        let counts: Vec<CountRow> = result.take(1)?;
        let total = counts.first().map(|c| c.total).unwrap_or(0);

        Ok((items, total))
    }
}
