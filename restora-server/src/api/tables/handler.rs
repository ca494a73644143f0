//! Dining Table API Handlers
//!
//! 桌台占用和释放由订单流程驱动，这里只负责台账管理和扫码查询。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use validator::Validate;

use crate::api::{ListQuery, Paged};
use crate::auth::Actor;
use crate::core::ServerState;
use crate::db::models::{
    DiningTable, DiningTableCreate, DiningTableUpdate, TableLocation, TableStatus,
    TableStatusUpdate,
};
use crate::db::repository::DiningTableRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message, parse_ref};

/// GET /api/tables - 本店桌台列表
pub async fn list(
    State(state): State<ServerState>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Paged<DiningTable>>>> {
    let restaurant_id = actor.require_restaurant()?;
    let repo = DiningTableRepository::new(state.db.clone());

    let tables = repo
        .find_by_restaurant(restaurant_id, query.pagination())
        .await?;
    let total = repo.count_by_restaurant(restaurant_id).await?;

    Ok(ok(Paged::new(tables, total, query.page, query.limit)))
}

/// GET /api/tables/qr/{qr_code} - 扫码定位桌台
pub async fn get_by_qr(
    State(state): State<ServerState>,
    Path(qr_code): Path<String>,
) -> AppResult<Json<AppResponse<DiningTable>>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo
        .find_by_qr(&qr_code)
        .await?
        .ok_or_else(|| AppError::not_found("Table not found"))?;
    Ok(ok(table))
}

/// GET /api/tables/{id} - 桌台详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<DiningTable>>> {
    let table_id = parse_ref("dining_table", &id)?;
    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo
        .find_by_id(&table_id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Table not found"))?;
    if !actor.is_owner_of(&table.restaurant) {
        return Err(AppError::forbidden("Not your table"));
    }

    Ok(ok(table))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<AppResponse<DiningTable>>> {
    let restaurant_id = actor.require_restaurant()?.clone();
    payload.validate()?;

    let qr_code = format!(
        "TABLE-{}-{}-{}",
        restaurant_id.key(),
        payload.number,
        Utc::now().timestamp_millis()
    );
    let table = DiningTable {
        id: None,
        restaurant: restaurant_id,
        number: payload.number,
        capacity: payload.capacity.unwrap_or(4),
        location: payload.location.unwrap_or(TableLocation::Indoor),
        status: TableStatus::Available,
        qr_code,
        is_active: true,
        current_order: None,
        created_at: Utc::now(),
    };

    let repo = DiningTableRepository::new(state.db.clone());
    let created = repo.create(table).await?;
    Ok(ok_with_message(created, "Table created"))
}

/// PUT /api/tables/{id} - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<AppResponse<DiningTable>>> {
    let table_id = parse_ref("dining_table", &id)?;
    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo
        .find_by_id(&table_id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Table not found"))?;
    if !actor.is_owner_of(&table.restaurant) {
        return Err(AppError::forbidden("Not your table"));
    }
    payload.validate()?;

    let updated = repo.update(&table_id.to_string(), payload).await?;
    Ok(ok(updated))
}

/// DELETE /api/tables/{id} - 删除桌台
pub async fn remove(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let table_id = parse_ref("dining_table", &id)?;
    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo
        .find_by_id(&table_id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Table not found"))?;
    if !actor.is_owner_of(&table.restaurant) {
        return Err(AppError::forbidden("Not your table"));
    }
    if table.current_order.is_some() {
        return Err(AppError::conflict("Table is occupied by an active order"));
    }

    repo.delete(&table_id.to_string()).await?;
    Ok(ok_with_message((), "Table deleted"))
}

/// PUT /api/tables/{id}/status - 手动调整桌台状态
pub async fn set_status(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(payload): Json<TableStatusUpdate>,
) -> AppResult<Json<AppResponse<DiningTable>>> {
    let table_id = parse_ref("dining_table", &id)?;
    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo
        .find_by_id(&table_id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Table not found"))?;
    if !actor.is_owner_of(&table.restaurant) {
        return Err(AppError::forbidden("Not your table"));
    }
    if table.current_order.is_some() && payload.status != TableStatus::Occupied {
        return Err(AppError::conflict("Table is occupied by an active order"));
    }

    repo.set_status(&table_id, payload.status).await?;
    let refreshed = repo
        .find_by_id(&table_id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Table not found"))?;
    Ok(ok(refreshed))
}
