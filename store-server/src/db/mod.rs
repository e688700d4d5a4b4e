//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine) plus schema definition.

pub mod models;
pub mod repository;

use shared::error::AppError;
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "store";
const DATABASE: &str = "store";

/// Database service that owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the embedded database at the given path and apply the schema
    pub async fn open(db_path: &Path) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        Self::define_schema(&db).await?;

        tracing::info!(path = %db_path.display(), "Database opened (embedded SurrealDB, RocksDB)");

        Ok(Self { db })
    }

    /// Define tables and indexes (idempotent)
    ///
    /// 唯一索引承担一致性兜底：email 重复注册、order_number 碰撞
    /// 都在存储层被拒绝。
    pub async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
        db.query(
            r#"
            DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
            DEFINE TABLE IF NOT EXISTS ledger_entry SCHEMALESS;
            DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
            DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS user_email_idx ON TABLE user FIELDS email UNIQUE;
            DEFINE INDEX IF NOT EXISTS order_number_idx ON TABLE order FIELDS order_number UNIQUE;
            DEFINE INDEX IF NOT EXISTS ledger_created_idx ON TABLE ledger_entry FIELDS created_at;
            "#,
        )
        .await
        .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
        .check()
        .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

        tracing::info!("Database schema applied");
        Ok(())
    }
}
