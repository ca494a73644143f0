//! 预订流转
//!
//! 预订没有严格状态机：店主可以直接设任意状态。顾客侧只有
//! 取消一条路径，且不可重复取消。联系方式在创建时从用户
//! 账号快照，后续改账号资料不回写历史预订。

use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use crate::auth::Actor;
use crate::db::models::{
    NotificationKind, Reservation, ReservationCancel, ReservationCreate, ReservationStatus,
    ReservationStatusUpdate, TablePreference, TableStatus,
};
use crate::db::repository::{
    DiningTableRepository, Pagination, ReservationRepository, RestaurantRepository, UserRepository,
};
use crate::realtime::{Channel, Event, EventBus};
use crate::services::NotificationService;
use crate::utils::{AppError, AppResult, time};

#[derive(Clone)]
pub struct ReservationService {
    reservations: ReservationRepository,
    restaurants: RestaurantRepository,
    users: UserRepository,
    tables: DiningTableRepository,
    notifications: NotificationService,
    bus: EventBus,
}

impl ReservationService {
    pub fn new(db: Surreal<Db>, bus: EventBus, notifications: NotificationService) -> Self {
        Self {
            reservations: ReservationRepository::new(db.clone()),
            restaurants: RestaurantRepository::new(db.clone()),
            users: UserRepository::new(db.clone()),
            tables: DiningTableRepository::new(db),
            notifications,
            bus,
        }
    }

    /// 顾客发起预订
    pub async fn create(&self, actor: &Actor, payload: ReservationCreate) -> AppResult<Reservation> {
        let customer = actor.require_customer()?.clone();

        let date = time::parse_date(&payload.date)?;
        time::validate_not_past(date)?;
        time::parse_time(&payload.time)?;

        let restaurant = self
            .restaurants
            .find_by_id(&payload.restaurant_id)
            .await?
            .ok_or_else(|| AppError::not_found("Restaurant not found"))?;
        if !restaurant.is_active {
            return Err(AppError::validation(
                "Restaurant is not taking reservations",
            ));
        }
        let restaurant_id = restaurant
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Restaurant record has no id"))?;

        // 联系方式快照自用户账号
        let user = self
            .users
            .find_by_id(&customer.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let reservation = Reservation {
            id: None,
            customer: customer.clone(),
            restaurant: restaurant_id.clone(),
            customer_name: user.name,
            customer_phone: user.phone.unwrap_or_default(),
            customer_email: user.email,
            date,
            time: payload.time,
            party_size: payload.party_size,
            table_preference: payload.table_preference.unwrap_or(TablePreference::Any),
            status: ReservationStatus::Pending,
            assigned_table: None,
            special_request: payload.special_request,
            confirmed_at: None,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: Utc::now(),
        };

        let stored = self.reservations.create(reservation).await?;
        let reservation_id = record_id(&stored)?;
        tracing::info!(reservation = %reservation_id, restaurant = %restaurant_id, "Reservation placed");

        self.emit(
            &Channel::Restaurant(restaurant_id.key().to_string()),
            "new-reservation",
            &stored,
        );
        self.notify(
            &restaurant.owner,
            &reservation_id,
            "New reservation",
            format!(
                "{} booked a table for {} on {} at {}",
                stored.customer_name, stored.party_size, stored.date, stored.time
            ),
        )
        .await;

        Ok(stored)
    }

    /// 店主流转预订状态，confirmed 时盖确认戳，可同时指派桌台
    pub async fn update_status(
        &self,
        actor: &Actor,
        reservation_id: &str,
        payload: ReservationStatusUpdate,
    ) -> AppResult<Reservation> {
        let reservation = self.fetch(reservation_id).await?;
        if !actor.is_owner_of(&reservation.restaurant) {
            return Err(AppError::forbidden("Not your restaurant's reservation"));
        }

        let id = record_id(&reservation)?;
        let assigned_table = match payload.table_id.as_deref() {
            Some(raw) => {
                let table = self
                    .tables
                    .find_by_id(raw)
                    .await?
                    .ok_or_else(|| AppError::not_found("Table not found"))?;
                if table.restaurant != reservation.restaurant {
                    return Err(AppError::validation(
                        "Table does not belong to this restaurant",
                    ));
                }
                table.id
            }
            None => None,
        };
        let confirmed_at =
            (payload.status == ReservationStatus::Confirmed).then(Utc::now);

        let updated = self
            .reservations
            .update_status(&id, payload.status, assigned_table.as_ref(), confirmed_at)
            .await?
            .ok_or_else(|| AppError::not_found("Reservation not found"))?;

        if let Some(table) = assigned_table.as_ref() {
            self.tables.set_status(table, TableStatus::Reserved).await?;
        }

        self.emit(
            &Channel::Restaurant(updated.restaurant.key().to_string()),
            "reservation-updated",
            &updated,
        );
        self.notify(
            &updated.customer,
            &id,
            "Reservation update",
            format!(
                "Your reservation on {} at {} is now {}",
                updated.date,
                updated.time,
                updated.status.as_str()
            ),
        )
        .await;

        Ok(updated)
    }

    /// 顾客取消预订，重复取消报冲突
    pub async fn cancel(
        &self,
        actor: &Actor,
        reservation_id: &str,
        payload: ReservationCancel,
    ) -> AppResult<Reservation> {
        let reservation = self.fetch(reservation_id).await?;
        let customer = actor.require_customer()?;
        if *customer != reservation.customer {
            return Err(AppError::forbidden("Not your reservation"));
        }

        let id = record_id(&reservation)?;
        let cancelled = self
            .reservations
            .cancel(&id, Utc::now(), payload.reason)
            .await?
            .ok_or_else(|| AppError::conflict("Reservation is already cancelled"))?;

        self.emit(
            &Channel::Restaurant(cancelled.restaurant.key().to_string()),
            "reservation-updated",
            &cancelled,
        );
        if let Ok(Some(restaurant)) = self
            .restaurants
            .find_by_id(&cancelled.restaurant.to_string())
            .await
        {
            self.notify(
                &restaurant.owner,
                &id,
                "Reservation cancelled",
                format!(
                    "{} cancelled the reservation on {} at {}",
                    cancelled.customer_name, cancelled.date, cancelled.time
                ),
            )
            .await;
        }

        Ok(cancelled)
    }

    /// 单条读取，仅当事人可见
    pub async fn get(&self, actor: &Actor, reservation_id: &str) -> AppResult<Reservation> {
        let reservation = self.fetch(reservation_id).await?;
        if !actor.is_reservation_party(&reservation) {
            return Err(AppError::forbidden("Not a party of this reservation"));
        }
        Ok(reservation)
    }

    /// 顾客侧列表
    pub async fn list_for_customer(
        &self,
        actor: &Actor,
        page: Pagination,
    ) -> AppResult<(Vec<Reservation>, i64)> {
        let customer = actor.require_customer()?;
        let items = self.reservations.find_by_customer(customer, page).await?;
        let total = self.reservations.count_by_customer(customer).await?;
        Ok((items, total))
    }

    /// 店主侧列表，可按状态过滤
    pub async fn list_for_restaurant(
        &self,
        actor: &Actor,
        status: Option<ReservationStatus>,
        page: Pagination,
    ) -> AppResult<(Vec<Reservation>, i64)> {
        let restaurant = actor.require_restaurant()?;
        let items = self
            .reservations
            .find_by_restaurant(restaurant, status, page)
            .await?;
        let total = self
            .reservations
            .count_by_restaurant(restaurant, status)
            .await?;
        Ok((items, total))
    }

    // ========== Internal ==========

    async fn fetch(&self, reservation_id: &str) -> AppResult<Reservation> {
        self.reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Reservation not found"))
    }

    fn emit(&self, channel: &Channel, name: &str, reservation: &Reservation) {
        match serde_json::to_value(reservation) {
            Ok(payload) => self.bus.publish(Event::new(channel, name, payload)),
            Err(err) => tracing::warn!(error = %err, "Failed to encode reservation event"),
        }
    }

    /// 预订通知，失败只记日志
    async fn notify(
        &self,
        recipient: &RecordId,
        reservation: &RecordId,
        title: &str,
        message: String,
    ) {
        if let Err(err) = self
            .notifications
            .notify(
                recipient,
                title,
                message,
                NotificationKind::Reservation,
                None,
                Some(reservation.clone()),
            )
            .await
        {
            tracing::warn!(error = %err, "Failed to send reservation notification");
        }
    }
}

fn record_id(reservation: &Reservation) -> AppResult<RecordId> {
    reservation
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Reservation record has no id"))
}
