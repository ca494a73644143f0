//! Menu Item Repository

use super::{BaseRepository, Pagination, RepoError, RepoResult};
use crate::db::models::{MenuCategory, MenuItem, MenuItemUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "menu_item";

/// List filters for a restaurant's menu
#[derive(Debug, Clone, Default)]
pub struct MenuFilter {
    pub category: Option<MenuCategory>,
    pub vegetarian_only: bool,
    pub available_only: bool,
}

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find menu item by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let item: Option<MenuItem> = self.base.db().select(thing).await?;
        Ok(item)
    }

    /// Resolve a batch of menu items by id, order not guaranteed
    pub async fn find_many(&self, ids: Vec<RecordId>) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE id INSIDE $ids")
            .bind(("ids", ids))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// List a restaurant's menu with optional filters
    pub async fn find_by_restaurant(
        &self,
        restaurant: &RecordId,
        filter: &MenuFilter,
        page: Pagination,
    ) -> RepoResult<Vec<MenuItem>> {
        let mut sql = String::from("SELECT * FROM menu_item WHERE restaurant = $restaurant");
        if filter.category.is_some() {
            sql.push_str(" AND category = $category");
        }
        if filter.vegetarian_only {
            sql.push_str(" AND is_vegetarian = true");
        }
        if filter.available_only {
            sql.push_str(" AND is_available = true");
        }
        sql.push_str(" ORDER BY name LIMIT $limit START $start");

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("restaurant", restaurant.to_string()))
            .bind(("limit", page.limit))
            .bind(("start", page.start()));
        if let Some(category) = filter.category {
            query = query.bind(("category", category));
        }

        let items: Vec<MenuItem> = query.await?.take(0)?;
        Ok(items)
    }

    /// Count a restaurant's menu items under the same filters
    pub async fn count_by_restaurant(
        &self,
        restaurant: &RecordId,
        filter: &MenuFilter,
    ) -> RepoResult<i64> {
        let mut sql = String::from("SELECT count() FROM menu_item WHERE restaurant = $restaurant");
        if filter.category.is_some() {
            sql.push_str(" AND category = $category");
        }
        if filter.vegetarian_only {
            sql.push_str(" AND is_vegetarian = true");
        }
        if filter.available_only {
            sql.push_str(" AND is_available = true");
        }
        sql.push_str(" GROUP ALL");

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("restaurant", restaurant.to_string()));
        if let Some(category) = filter.category {
            query = query.bind(("category", category));
        }

        let mut result = query.await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Create a new menu item
    pub async fn create(&self, item: MenuItem) -> RepoResult<MenuItem> {
        let created: Option<MenuItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Partial update from the API payload
    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
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
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Hard delete a menu item
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

    /// Atomic order-counter increment by ordered quantity
    pub async fn increment_orders(&self, id: &RecordId, quantity: i32) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET total_orders += $qty")
            .bind(("thing", id.clone()))
            .bind(("qty", quantity as i64))
            .await?;
        Ok(())
    }
}
