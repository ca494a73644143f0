//! Reservation Repository

use super::{BaseRepository, Pagination, RepoError, RepoResult};
use crate::db::models::{Reservation, ReservationStatus};
use chrono::{DateTime, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "reservation";

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find reservation by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Reservation>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let reservation: Option<Reservation> = self.base.db().select(thing).await?;
        Ok(reservation)
    }

    /// Create a new reservation
    pub async fn create(&self, reservation: Reservation) -> RepoResult<Reservation> {
        let created: Option<Reservation> =
            self.base.db().create(TABLE).content(reservation).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create reservation".to_string()))
    }

    /// List a customer's reservations, newest first
    pub async fn find_by_customer(
        &self,
        customer: &RecordId,
        page: Pagination,
    ) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query(
                "SELECT * FROM reservation WHERE customer = $customer \
                 ORDER BY created_at DESC LIMIT $limit START $start",
            )
            .bind(("customer", customer.to_string()))
            .bind(("limit", page.limit))
            .bind(("start", page.start()))
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// Count a customer's reservations
    pub async fn count_by_customer(&self, customer: &RecordId) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM reservation WHERE customer = $customer GROUP ALL")
            .bind(("customer", customer.to_string()))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// List a restaurant's reservations, soonest date first
    pub async fn find_by_restaurant(
        &self,
        restaurant: &RecordId,
        status: Option<ReservationStatus>,
        page: Pagination,
    ) -> RepoResult<Vec<Reservation>> {
        let mut sql = String::from("SELECT * FROM reservation WHERE restaurant = $restaurant");
        if status.is_some() {
            sql.push_str(" AND status = $status");
        }
        sql.push_str(" ORDER BY date, time LIMIT $limit START $start");

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

        let reservations: Vec<Reservation> = query.await?.take(0)?;
        Ok(reservations)
    }

    /// Count a restaurant's reservations under the same filter
    pub async fn count_by_restaurant(
        &self,
        restaurant: &RecordId,
        status: Option<ReservationStatus>,
    ) -> RepoResult<i64> {
        let mut sql = String::from("SELECT count() FROM reservation WHERE restaurant = $restaurant");
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

    /// Owner status update, optionally assigning a table / stamping confirmation
    pub async fn update_status(
        &self,
        id: &RecordId,
        status: ReservationStatus,
        assigned_table: Option<&RecordId>,
        confirmed_at: Option<DateTime<Utc>>,
    ) -> RepoResult<Option<Reservation>> {
        let mut sql = String::from("UPDATE $thing SET status = $status");
        if assigned_table.is_some() {
            sql.push_str(", assigned_table = $table");
        }
        if confirmed_at.is_some() {
            sql.push_str(", confirmed_at = $confirmed_at");
        }
        sql.push_str(" RETURN AFTER");

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("thing", id.clone()))
            .bind(("status", status));
        if let Some(table) = assigned_table {
            query = query.bind(("table", table.to_string()));
        }
        if let Some(at) = confirmed_at {
            query = query.bind(("confirmed_at", at));
        }

        let mut result = query.await?;
        let reservations: Vec<Reservation> = result.take(0)?;
        Ok(reservations.into_iter().next())
    }

    /// Compare-and-set cancellation, None when already cancelled
    pub async fn cancel(
        &self,
        id: &RecordId,
        at: DateTime<Utc>,
        reason: Option<String>,
    ) -> RepoResult<Option<Reservation>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET status = $to, cancelled_at = $at, \
                 cancellation_reason = $reason \
                 WHERE status != $to RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("to", ReservationStatus::Cancelled))
            .bind(("at", at))
            .bind(("reason", reason))
            .await?;
        let reservations: Vec<Reservation> = result.take(0)?;
        Ok(reservations.into_iter().next())
    }
}
