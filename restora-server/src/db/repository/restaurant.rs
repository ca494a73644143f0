//! Restaurant Repository

use super::{BaseRepository, Pagination, RepoError, RepoResult};
use crate::db::models::{Restaurant, RestaurantUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "restaurant";

/// List filters for browsing restaurants
#[derive(Debug, Clone, Default)]
pub struct RestaurantFilter {
    pub cuisine: Option<String>,
    pub price_range: Option<i32>,
    pub min_rating: Option<f64>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct RestaurantRepository {
    base: BaseRepository,
}

impl RestaurantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find restaurant by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Restaurant>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let restaurant: Option<Restaurant> = self.base.db().select(thing).await?;
        Ok(restaurant)
    }

    /// Find the restaurant owned by a user
    pub async fn find_by_owner(&self, owner: &RecordId) -> RepoResult<Option<Restaurant>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM restaurant WHERE owner = $owner LIMIT 1")
            .bind(("owner", owner.to_string()))
            .await?;
        let restaurants: Vec<Restaurant> = result.take(0)?;
        Ok(restaurants.into_iter().next())
    }

    /// List active restaurants under optional filters, newest first
    pub async fn find_all(
        &self,
        filter: &RestaurantFilter,
        page: Pagination,
    ) -> RepoResult<Vec<Restaurant>> {
        let mut sql = String::from("SELECT * FROM restaurant WHERE is_active = true");
        push_filter_clauses(&mut sql, filter);
        sql.push_str(" ORDER BY created_at DESC LIMIT $limit START $start");

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("limit", page.limit))
            .bind(("start", page.start()));
        if let Some(cuisine) = &filter.cuisine {
            query = query.bind(("cuisine", cuisine.clone()));
        }
        if let Some(price_range) = filter.price_range {
            query = query.bind(("price_range", price_range as i64));
        }
        if let Some(min_rating) = filter.min_rating {
            query = query.bind(("min_rating", min_rating));
        }
        if let Some(search) = &filter.search {
            query = query.bind(("search", search.to_lowercase()));
        }

        let restaurants: Vec<Restaurant> = query.await?.take(0)?;
        Ok(restaurants)
    }

    /// Count active restaurants under the same filters
    pub async fn count_all(&self, filter: &RestaurantFilter) -> RepoResult<i64> {
        let mut sql = String::from("SELECT count() FROM restaurant WHERE is_active = true");
        push_filter_clauses(&mut sql, filter);
        sql.push_str(" GROUP ALL");

        let mut query = self.base.db().query(sql);
        if let Some(cuisine) = &filter.cuisine {
            query = query.bind(("cuisine", cuisine.clone()));
        }
        if let Some(price_range) = filter.price_range {
            query = query.bind(("price_range", price_range as i64));
        }
        if let Some(min_rating) = filter.min_rating {
            query = query.bind(("min_rating", min_rating));
        }
        if let Some(search) = &filter.search {
            query = query.bind(("search", search.to_lowercase()));
        }

        let mut result = query.await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Resolve a restaurant from its QR identifier
    pub async fn find_by_qr(&self, qr_code: &str) -> RepoResult<Option<Restaurant>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM restaurant WHERE qr_code = $qr LIMIT 1")
            .bind(("qr", qr_code.to_string()))
            .await?;
        let restaurants: Vec<Restaurant> = result.take(0)?;
        Ok(restaurants.into_iter().next())
    }

    /// Create a new restaurant (one per owner)
    ///
    /// 调用方可以预先指定记录 id（QR 标识需要在入库前就包含真实 id）。
    pub async fn create(&self, restaurant: Restaurant) -> RepoResult<Restaurant> {
        if self.find_by_owner(&restaurant.owner).await?.is_some() {
            return Err(RepoError::Duplicate(
                "Owner already has a restaurant".to_string(),
            ));
        }

        let created: Option<Restaurant> = match restaurant.id.clone() {
            Some(id) => {
                let mut content = restaurant;
                content.id = None;
                self.base.db().create(id).content(content).await?
            }
            None => self.base.db().create(TABLE).content(restaurant).await?,
        };
        created.ok_or_else(|| RepoError::Database("Failed to create restaurant".to_string()))
    }

    /// Partial update from the API payload
    pub async fn update(&self, id: &str, data: RestaurantUpdate) -> RepoResult<Restaurant> {
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
            .ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", id)))
    }

    /// Soft delete: restaurants are deactivated, never removed
    pub async fn deactivate(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET is_active = false")
            .bind(("thing", id.clone()))
            .await?;
        Ok(())
    }

    /// Overwrite the review aggregates
    pub async fn set_rating(&self, id: &RecordId, average: f64, total: i64) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET average_rating = $avg, total_reviews = $total")
            .bind(("thing", id.clone()))
            .bind(("avg", average))
            .bind(("total", total))
            .await?;
        Ok(())
    }

    /// Atomic order-counter increment (never decremented)
    pub async fn increment_orders(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET total_orders += 1")
            .bind(("thing", id.clone()))
            .await?;
        Ok(())
    }

    /// Flag the restaurant as serving vegetarian options
    pub async fn set_vegetarian_options(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET has_vegetarian_options = true")
            .bind(("thing", id.clone()))
            .await?;
        Ok(())
    }
}

fn push_filter_clauses(sql: &mut String, filter: &RestaurantFilter) {
    if filter.cuisine.is_some() {
        sql.push_str(" AND cuisine = $cuisine");
    }
    if filter.price_range.is_some() {
        sql.push_str(" AND price_range = $price_range");
    }
    if filter.min_rating.is_some() {
        sql.push_str(" AND average_rating >= $min_rating");
    }
    if filter.search.is_some() {
        sql.push_str(
            " AND (string::lowercase(name) CONTAINS $search \
             OR string::lowercase(description) CONTAINS $search)",
        );
    }
}
