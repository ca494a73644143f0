//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine) connection and schema bootstrap.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "restora";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at the given path and bootstrap the schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        Self::define_schema(&db).await?;

        tracing::info!("Database connection established (RocksDB at {db_path})");
        Ok(Self { db })
    }

    /// Unique-index bootstrap, idempotent
    ///
    /// (customer, order) 评论唯一性在仓储层插入前查重保证：order 可为空，
    /// 空值列上的 UNIQUE 索引会误伤无订单评论。
    async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
        db.query(
            "
            DEFINE INDEX IF NOT EXISTS idx_user_email ON TABLE user COLUMNS email UNIQUE;
            DEFINE INDEX IF NOT EXISTS idx_coupon_code ON TABLE coupon COLUMNS code UNIQUE;
            DEFINE INDEX IF NOT EXISTS idx_restaurant_qr ON TABLE restaurant COLUMNS qr_code UNIQUE;
            DEFINE INDEX IF NOT EXISTS idx_table_number ON TABLE dining_table COLUMNS restaurant, number UNIQUE;
            ",
        )
        .await
        .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
        Ok(())
    }
}
