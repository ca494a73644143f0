//! Reservation API Handlers
//!
//! 预订规则都在 ReservationService，这里只做参数校验和身份传递。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::api::{ListQuery, Paged};
use crate::auth::Actor;
use crate::core::ServerState;
use crate::db::models::{
    Reservation, ReservationCancel, ReservationCreate, ReservationStatus, ReservationStatusUpdate,
};
use crate::db::repository::Pagination;
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

/// 店侧预订列表参数
#[derive(Debug, Deserialize)]
pub struct RestaurantReservationsQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub status: Option<ReservationStatus>,
}

/// POST /api/reservations - 预订
pub async fn create(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<AppResponse<Reservation>>> {
    payload.validate()?;
    let reservation = state.reservations.create(&actor, payload).await?;
    Ok(ok_with_message(reservation, "Reservation requested"))
}

/// GET /api/reservations/my - 我的预订
pub async fn list_mine(
    State(state): State<ServerState>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Paged<Reservation>>>> {
    let (items, total) = state
        .reservations
        .list_for_customer(&actor, query.pagination())
        .await?;
    Ok(ok(Paged::new(items, total, query.page, query.limit)))
}

/// GET /api/reservations/restaurant - 店侧预订
pub async fn list_for_restaurant(
    State(state): State<ServerState>,
    actor: Actor,
    Query(query): Query<RestaurantReservationsQuery>,
) -> AppResult<Json<AppResponse<Paged<Reservation>>>> {
    let page = Pagination::new(query.page, query.limit);
    let (items, total) = state
        .reservations
        .list_for_restaurant(&actor, query.status, page)
        .await?;
    Ok(ok(Paged::new(items, total, query.page, query.limit)))
}

/// GET /api/reservations/{id} - 预订详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Reservation>>> {
    let reservation = state.reservations.get(&actor, &id).await?;
    Ok(ok(reservation))
}

/// PUT /api/reservations/{id}/status - 更新预订状态
pub async fn update_status(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(payload): Json<ReservationStatusUpdate>,
) -> AppResult<Json<AppResponse<Reservation>>> {
    let reservation = state.reservations.update_status(&actor, &id, payload).await?;
    Ok(ok(reservation))
}

/// PUT /api/reservations/{id}/cancel - 取消预订
pub async fn cancel(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(payload): Json<ReservationCancel>,
) -> AppResult<Json<AppResponse<Reservation>>> {
    let reservation = state.reservations.cancel(&actor, &id, payload).await?;
    Ok(ok_with_message(reservation, "Reservation cancelled"))
}
