//! Dining Table Repository

use super::{BaseRepository, Pagination, RepoError, RepoResult};
use crate::db::models::{DiningTable, DiningTableUpdate, TableStatus};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiningTable>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let table: Option<DiningTable> = self.base.db().select(thing).await?;
        Ok(table)
    }

    /// Find table by number within a restaurant
    pub async fn find_by_number(
        &self,
        restaurant: &RecordId,
        number: i32,
    ) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM dining_table \
                 WHERE restaurant = $restaurant AND number = $number LIMIT 1",
            )
            .bind(("restaurant", restaurant.to_string()))
            .bind(("number", number as i64))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Resolve a table from its QR identifier
    pub async fn find_by_qr(&self, qr_code: &str) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE qr_code = $qr LIMIT 1")
            .bind(("qr", qr_code.to_string()))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// List a restaurant's tables by number
    pub async fn find_by_restaurant(
        &self,
        restaurant: &RecordId,
        page: Pagination,
    ) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query(
                "SELECT * FROM dining_table WHERE restaurant = $restaurant \
                 ORDER BY number LIMIT $limit START $start",
            )
            .bind(("restaurant", restaurant.to_string()))
            .bind(("limit", page.limit))
            .bind(("start", page.start()))
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Count a restaurant's tables
    pub async fn count_by_restaurant(&self, restaurant: &RecordId) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM dining_table WHERE restaurant = $restaurant GROUP ALL")
            .bind(("restaurant", restaurant.to_string()))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Create a new table
    pub async fn create(&self, table: DiningTable) -> RepoResult<DiningTable> {
        // Check duplicate number in same restaurant
        if self
            .find_by_number(&table.restaurant, table.number)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Table {} already exists in this restaurant",
                table.number
            )));
        }

        let created: Option<DiningTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Partial update from the API payload
    pub async fn update(&self, id: &str, data: DiningTableUpdate) -> RepoResult<DiningTable> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
    }

    /// Hard delete a table
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }

    /// Overwrite table status
    pub async fn set_status(&self, id: &RecordId, status: TableStatus) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET status = $status")
            .bind(("thing", id.clone()))
            .bind(("status", status))
            .await?;
        Ok(())
    }

    /// Mark table occupied by an order
    pub async fn occupy(&self, id: &RecordId, order: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET status = $status, current_order = $order")
            .bind(("thing", id.clone()))
            .bind(("status", TableStatus::Occupied))
            .bind(("order", order.to_string()))
            .await?;
        Ok(())
    }

    /// Free whichever table is holding an order, if any
    pub async fn release_by_order(&self, restaurant: &RecordId, order: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "UPDATE dining_table SET status = $status, current_order = NONE \
                 WHERE restaurant = $restaurant AND current_order = $order",
            )
            .bind(("status", TableStatus::Available))
            .bind(("restaurant", restaurant.to_string()))
            .bind(("order", order.to_string()))
            .await?;
        Ok(())
    }
}
