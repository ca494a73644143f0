//! Review Repository

use super::{BaseRepository, Pagination, RepoError, RepoResult};
use crate::db::models::{OwnerResponse, Review, ReviewUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "review";

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find review by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Review>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let review: Option<Review> = self.base.db().select(thing).await?;
        Ok(review)
    }

    /// Find the review a customer left for a specific order
    pub async fn find_by_customer_and_order(
        &self,
        customer: &RecordId,
        order: &RecordId,
    ) -> RepoResult<Option<Review>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM review WHERE customer = $customer AND order = $order LIMIT 1")
            .bind(("customer", customer.to_string()))
            .bind(("order", order.to_string()))
            .await?;
        let reviews: Vec<Review> = result.take(0)?;
        Ok(reviews.into_iter().next())
    }

    /// List visible reviews of a restaurant, newest first
    pub async fn find_by_restaurant(
        &self,
        restaurant: &RecordId,
        page: Pagination,
    ) -> RepoResult<Vec<Review>> {
        let reviews: Vec<Review> = self
            .base
            .db()
            .query(
                "SELECT * FROM review WHERE restaurant = $restaurant AND is_visible = true \
                 ORDER BY created_at DESC LIMIT $limit START $start",
            )
            .bind(("restaurant", restaurant.to_string()))
            .bind(("limit", page.limit))
            .bind(("start", page.start()))
            .await?
            .take(0)?;
        Ok(reviews)
    }

    /// Count visible reviews of a restaurant
    pub async fn count_by_restaurant(&self, restaurant: &RecordId) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() FROM review \
                 WHERE restaurant = $restaurant AND is_visible = true GROUP ALL",
            )
            .bind(("restaurant", restaurant.to_string()))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Every review of a restaurant, visibility ignored
    ///
    /// 评分汇总用：全量扫描，不分页。
    pub async fn find_all_by_restaurant(&self, restaurant: &RecordId) -> RepoResult<Vec<Review>> {
        let reviews: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review WHERE restaurant = $restaurant")
            .bind(("restaurant", restaurant.to_string()))
            .await?
            .take(0)?;
        Ok(reviews)
    }

    /// List a customer's reviews, newest first
    pub async fn find_by_customer(
        &self,
        customer: &RecordId,
        page: Pagination,
    ) -> RepoResult<Vec<Review>> {
        let reviews: Vec<Review> = self
            .base
            .db()
            .query(
                "SELECT * FROM review WHERE customer = $customer \
                 ORDER BY created_at DESC LIMIT $limit START $start",
            )
            .bind(("customer", customer.to_string()))
            .bind(("limit", page.limit))
            .bind(("start", page.start()))
            .await?
            .take(0)?;
        Ok(reviews)
    }

    /// Create a new review
    ///
    /// (customer, order) 查重在这里：order 可为空，数据库唯一索引覆盖不了。
    pub async fn create(&self, review: Review) -> RepoResult<Review> {
        if let Some(order) = &review.order
            && self
                .find_by_customer_and_order(&review.customer, order)
                .await?
                .is_some()
        {
            return Err(RepoError::Duplicate(
                "Order has already been reviewed".to_string(),
            ));
        }

        let created: Option<Review> = self.base.db().create(TABLE).content(review).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create review".to_string()))
    }

    /// Partial update from the API payload
    pub async fn update(&self, id: &str, data: ReviewUpdate) -> RepoResult<Review> {
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
            .ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)))
    }

    /// Hard delete a review
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

    /// Attach the owner's response
    pub async fn set_response(&self, id: &RecordId, response: OwnerResponse) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET response = $response")
            .bind(("thing", id.clone()))
            .bind(("response", response))
            .await?;
        Ok(())
    }

    /// Record a helpful vote
    pub async fn add_helpful_vote(&self, id: &RecordId, voter: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET helpful_by += $voter, helpful_count += 1")
            .bind(("thing", id.clone()))
            .bind(("voter", voter.to_string()))
            .await?;
        Ok(())
    }
}
