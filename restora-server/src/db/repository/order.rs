//! Order Repository
//!
//! 订单永不硬删；状态推进走 compare-and-set，输掉竞争返回 None。

use super::{BaseRepository, Pagination, RepoError, RepoResult};
use crate::db::models::{
    CancelledBy, Order, OrderStats, OrderStatus, PaymentStatus, StatusHistoryEntry,
};
use chrono::{DateTime, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Total number of orders ever created
    pub async fn count_all(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM order GROUP ALL")
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// List a customer's orders, newest first
    pub async fn find_by_customer(
        &self,
        customer: &RecordId,
        page: Pagination,
    ) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE customer = $customer \
                 ORDER BY created_at DESC LIMIT $limit START $start",
            )
            .bind(("customer", customer.to_string()))
            .bind(("limit", page.limit))
            .bind(("start", page.start()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Count a customer's orders
    pub async fn count_by_customer(&self, customer: &RecordId) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM order WHERE customer = $customer GROUP ALL")
            .bind(("customer", customer.to_string()))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// List a restaurant's orders, optionally filtered by status, newest first
    pub async fn find_by_restaurant(
        &self,
        restaurant: &RecordId,
        status: Option<OrderStatus>,
        page: Pagination,
    ) -> RepoResult<Vec<Order>> {
        let mut sql = String::from("SELECT * FROM order WHERE restaurant = $restaurant");
        if status.is_some() {
            sql.push_str(" AND status = $status");
        }
        sql.push_str(" ORDER BY created_at DESC LIMIT $limit START $start");

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("restaurant", restaurant.to_string()))
            .bind(("limit", page.limit))
            .bind(("start", page.start()));
        if let Some(status) = status {
            query = query.bind(("status", status));
        }

        let orders: Vec<Order> = query.await?.take(0)?;
        Ok(orders)
    }

    /// Count a restaurant's orders under the same filter
    pub async fn count_by_restaurant(
        &self,
        restaurant: &RecordId,
        status: Option<OrderStatus>,
    ) -> RepoResult<i64> {
        let mut sql = String::from("SELECT count() FROM order WHERE restaurant = $restaurant");
        if status.is_some() {
            sql.push_str(" AND status = $status");
        }
        sql.push_str(" GROUP ALL");

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("restaurant", restaurant.to_string()));
        if let Some(status) = status {
            query = query.bind(("status", status));
        }

        let mut result = query.await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Compare-and-set status advance with history append
    ///
    /// WHERE status = $from 把并发竞争压进存储层：输掉的请求拿到 None。
    pub async fn advance_status(
        &self,
        id: &RecordId,
        from: OrderStatus,
        to: OrderStatus,
        entry: StatusHistoryEntry,
    ) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET status = $to, status_history += $entry \
                 WHERE status = $from RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("to", to))
            .bind(("from", from))
            .bind(("entry", entry))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Compare-and-set cancellation, legal only from pending/received
    pub async fn cancel(
        &self,
        id: &RecordId,
        entry: StatusHistoryEntry,
        cancelled_by: CancelledBy,
        reason: Option<String>,
    ) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET status = $to, status_history += $entry, \
                 cancelled_by = $by, cancellation_reason = $reason \
                 WHERE status INSIDE $cancellable RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("to", OrderStatus::Cancelled))
            .bind(("entry", entry))
            .bind(("by", cancelled_by))
            .bind(("reason", reason))
            .bind(("cancellable", vec![OrderStatus::Pending, OrderStatus::Received]))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// First-write-wins rating, None when already rated
    pub async fn rate(
        &self,
        id: &RecordId,
        rating: i32,
        review: Option<String>,
    ) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET rating = $rating, review = $review \
                 WHERE rating = NONE RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("rating", rating as i64))
            .bind(("review", review))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Stamp completion time
    pub async fn set_completed_at(&self, id: &RecordId, at: DateTime<Utc>) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET completed_at = $at")
            .bind(("thing", id.clone()))
            .bind(("at", at))
            .await?;
        Ok(())
    }

    /// Overwrite payment status
    pub async fn set_payment_status(&self, id: &RecordId, status: PaymentStatus) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET payment_status = $status")
            .bind(("thing", id.clone()))
            .bind(("status", status))
            .await?;
        Ok(())
    }

    /// Per-status counts plus completed revenue for one restaurant
    pub async fn stats(&self, restaurant: &RecordId) -> RepoResult<OrderStats> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT status, count() AS count FROM order \
                 WHERE restaurant = $restaurant GROUP BY status",
            )
            .query(
                "SELECT math::sum(final_amount) AS revenue FROM order \
                 WHERE restaurant = $restaurant AND status = $completed GROUP ALL",
            )
            .bind(("restaurant", restaurant.to_string()))
            .bind(("completed", OrderStatus::Completed))
            .await?;

        let rows: Vec<StatusCountRow> = result.take(0)?;
        let revenue: Option<f64> = result.take((1, "revenue"))?;

        let mut stats = OrderStats {
            total_revenue: revenue.unwrap_or(0.0),
            ..OrderStats::default()
        };
        for row in rows {
            stats.total_orders += row.count;
            match row.status {
                OrderStatus::Pending => stats.pending = row.count,
                OrderStatus::Received => stats.received = row.count,
                OrderStatus::Preparing => stats.preparing = row.count,
                OrderStatus::Ready => stats.ready = row.count,
                OrderStatus::Served => stats.served = row.count,
                OrderStatus::Completed => stats.completed = row.count,
                OrderStatus::Cancelled => stats.cancelled = row.count,
            }
        }
        Ok(stats)
    }
}

#[derive(Debug, serde::Deserialize)]
struct StatusCountRow {
    status: OrderStatus,
    count: i64,
}
