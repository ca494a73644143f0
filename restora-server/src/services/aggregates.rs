//! 聚合字段维护
//!
//! ## 设计原则
//! - 评分聚合全量重算：并发乱序到达也收敛到同一结果
//! - 计数器只增不减，取消订单不回退
//! - 与触发它的业务写入同步执行，不走异步队列

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use crate::db::models::OrderItem;
use crate::db::repository::{MenuItemRepository, RestaurantRepository, ReviewRepository};
use crate::utils::AppResult;

#[derive(Clone)]
pub struct AggregateService {
    reviews: ReviewRepository,
    restaurants: RestaurantRepository,
    menu_items: MenuItemRepository,
}

impl AggregateService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            reviews: ReviewRepository::new(db.clone()),
            restaurants: RestaurantRepository::new(db.clone()),
            menu_items: MenuItemRepository::new(db),
        }
    }

    /// 评价增删改后重算餐厅评分
    ///
    /// 均值保留 1 位小数，无评价时归零。返回 (average, total)。
    pub async fn recompute_restaurant_rating(
        &self,
        restaurant: &RecordId,
    ) -> AppResult<(f64, i64)> {
        let reviews = self.reviews.find_all_by_restaurant(restaurant).await?;
        let total = reviews.len() as i64;
        let average = if reviews.is_empty() {
            0.0
        } else {
            let sum: i64 = reviews.iter().map(|r| r.rating as i64).sum();
            (sum as f64 / total as f64 * 10.0).round() / 10.0
        };

        self.restaurants
            .set_rating(restaurant, average, total)
            .await?;
        tracing::debug!(restaurant = %restaurant, average, total, "Rating aggregates recomputed");

        Ok((average, total))
    }

    /// 下单成功后推进只增计数器
    pub async fn apply_order_counters(
        &self,
        restaurant: &RecordId,
        items: &[OrderItem],
    ) -> AppResult<()> {
        self.restaurants.increment_orders(restaurant).await?;
        for item in items {
            self.menu_items
                .increment_orders(&item.menu_item, item.quantity)
                .await?;
        }
        Ok(())
    }

    /// 素食菜品上架时为餐厅打素食标
    pub async fn flag_vegetarian_options(&self, restaurant: &RecordId) -> AppResult<()> {
        self.restaurants.set_vegetarian_options(restaurant).await?;
        Ok(())
    }
}
