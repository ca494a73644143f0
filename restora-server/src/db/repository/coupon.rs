//! Coupon Repository

use super::{BaseRepository, Pagination, RepoError, RepoResult};
use crate::db::models::{Coupon, CouponUpdate, CouponUse};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "coupon";

#[derive(Clone)]
pub struct CouponRepository {
    base: BaseRepository,
}

impl CouponRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find coupon by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Coupon>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let coupon: Option<Coupon> = self.base.db().select(thing).await?;
        Ok(coupon)
    }

    /// Find by normalized code within one restaurant
    pub async fn find_by_code(
        &self,
        code: &str,
        restaurant: &RecordId,
    ) -> RepoResult<Option<Coupon>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM coupon WHERE code = $code AND restaurant = $restaurant LIMIT 1")
            .bind(("code", code.to_string()))
            .bind(("restaurant", restaurant.to_string()))
            .await?;
        let coupons: Vec<Coupon> = result.take(0)?;
        Ok(coupons.into_iter().next())
    }

    /// List a restaurant's coupons, newest first
    pub async fn find_by_restaurant(
        &self,
        restaurant: &RecordId,
        page: Pagination,
    ) -> RepoResult<Vec<Coupon>> {
        let coupons: Vec<Coupon> = self
            .base
            .db()
            .query(
                "SELECT * FROM coupon WHERE restaurant = $restaurant \
                 ORDER BY created_at DESC LIMIT $limit START $start",
            )
            .bind(("restaurant", restaurant.to_string()))
            .bind(("limit", page.limit))
            .bind(("start", page.start()))
            .await?
            .take(0)?;
        Ok(coupons)
    }

    /// Count a restaurant's coupons
    pub async fn count_by_restaurant(&self, restaurant: &RecordId) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM coupon WHERE restaurant = $restaurant GROUP ALL")
            .bind(("restaurant", restaurant.to_string()))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Create a new coupon (code globally unique)
    pub async fn create(&self, coupon: Coupon) -> RepoResult<Coupon> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM coupon WHERE code = $code LIMIT 1")
            .bind(("code", coupon.code.clone()))
            .await?;
        let existing: Vec<Coupon> = result.take(0)?;
        if !existing.is_empty() {
            return Err(RepoError::Duplicate(format!(
                "Coupon code '{}' already exists",
                coupon.code
            )));
        }

        let created: Option<Coupon> = self.base.db().create(TABLE).content(coupon).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create coupon".to_string()))
    }

    /// Partial update from the API payload
    pub async fn update(&self, id: &str, data: CouponUpdate) -> RepoResult<Coupon> {
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
            .ok_or_else(|| RepoError::NotFound(format!("Coupon {} not found", id)))
    }

    /// Hard delete a coupon
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

    /// Bump global usage count and replace the per-user ledger
    pub async fn record_use(&self, id: &RecordId, used_by: Vec<CouponUse>) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET usage_count += 1, used_by = $used_by")
            .bind(("thing", id.clone()))
            .bind(("used_by", used_by))
            .await?;
        Ok(())
    }
}
