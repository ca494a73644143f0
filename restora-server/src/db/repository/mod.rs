//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

// Accounts
pub mod user;

// Restaurant Domain
pub mod menu_item;
pub mod restaurant;

// Orders
pub mod order;

// Engagement
pub mod coupon;
pub mod review;

// Front of house
pub mod dining_table;
pub mod reservation;

// Messaging
pub mod chat;
pub mod notification;

// Re-exports
pub use chat::ChatRepository;
pub use coupon::CouponRepository;
pub use dining_table::DiningTableRepository;
pub use menu_item::{MenuFilter, MenuItemRepository};
pub use notification::NotificationRepository;
pub use order::OrderRepository;
pub use reservation::ReservationRepository;
pub use restaurant::{RestaurantFilter, RestaurantRepository};
pub use review::ReviewRepository;
pub use user::UserRepository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "order:abc".parse()?;
//   - UPDATE/DELETE 目标位置绑定原生 RecordId ($thing)
//   - 关系字段经 serde_helpers 以字符串存储，WHERE 比较一律绑定字符串，
//     两侧形态一致才能命中

/// Pagination window (1-based page)
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, 100),
        }
    }

    pub fn start(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
