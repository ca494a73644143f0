//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::Deserialize;
use surrealdb::RecordId;
use uuid::Uuid;
use validator::Validate;

use crate::api::Paged;
use crate::auth::Actor;
use crate::core::ServerState;
use crate::db::models::{Restaurant, RestaurantCreate, RestaurantUpdate};
use crate::db::repository::{Pagination, RestaurantFilter, RestaurantRepository};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message, parse_ref};

/// 餐厅浏览查询参数
#[derive(Debug, Default, Deserialize)]
pub struct RestaurantListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub cuisine: Option<String>,
    pub price_range: Option<i32>,
    pub min_rating: Option<f64>,
    pub search: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

impl RestaurantListQuery {
    fn filter(&self) -> RestaurantFilter {
        RestaurantFilter {
            cuisine: self.cuisine.clone(),
            price_range: self.price_range,
            min_rating: self.min_rating,
            search: self.search.clone(),
        }
    }
}

/// GET /api/restaurants - 浏览餐厅
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<RestaurantListQuery>,
) -> AppResult<Json<AppResponse<Paged<Restaurant>>>> {
    let repo = RestaurantRepository::new(state.db.clone());
    let filter = query.filter();
    let page = Pagination::new(query.page, query.limit);

    let restaurants = repo.find_all(&filter, page).await?;
    let total = repo.count_all(&filter).await?;

    Ok(ok(Paged::new(restaurants, total, query.page, query.limit)))
}

/// GET /api/restaurants/{id} - 餐厅详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Restaurant>>> {
    let restaurant_id = parse_ref("restaurant", &id)?;
    let repo = RestaurantRepository::new(state.db.clone());
    let restaurant = repo
        .find_by_id(&restaurant_id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Restaurant not found"))?;
    Ok(ok(restaurant))
}

/// GET /api/restaurants/qr/{qr_code} - 扫码定位餐厅
pub async fn get_by_qr(
    State(state): State<ServerState>,
    Path(qr_code): Path<String>,
) -> AppResult<Json<AppResponse<Restaurant>>> {
    let repo = RestaurantRepository::new(state.db.clone());
    let restaurant = repo
        .find_by_qr(&qr_code)
        .await?
        .ok_or_else(|| AppError::not_found("Restaurant not found"))?;
    Ok(ok(restaurant))
}

/// GET /api/restaurants/my-restaurant - 我的餐厅
pub async fn my_restaurant(
    State(state): State<ServerState>,
    actor: Actor,
) -> AppResult<Json<AppResponse<Restaurant>>> {
    let restaurant_id = actor.require_restaurant()?;
    let repo = RestaurantRepository::new(state.db.clone());
    let restaurant = repo
        .find_by_id(&restaurant_id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Restaurant not found"))?;
    Ok(ok(restaurant))
}

/// POST /api/restaurants - 创建餐厅
pub async fn create(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<Json<AppResponse<Restaurant>>> {
    if actor.is_customer() {
        return Err(AppError::forbidden("Restaurant account required"));
    }
    payload.validate()?;

    // QR 标识要包含真实记录 id，先定 key 再连同 QR 一次写入
    let key = Uuid::new_v4().simple().to_string();
    let qr_code = format!("RESTORA-{}-{}", key, Utc::now().timestamp_millis());

    let restaurant = Restaurant {
        id: Some(RecordId::from_table_key("restaurant", key)),
        owner: actor.user_id().clone(),
        name: payload.name,
        description: payload.description,
        cuisine: payload.cuisine,
        price_range: payload.price_range,
        address: payload.address,
        phone: payload.phone,
        email: payload.email,
        opening_hours: payload.opening_hours.unwrap_or_default(),
        seating_capacity: payload.seating_capacity.unwrap_or(0),
        delivery_available: payload.delivery_available.unwrap_or(false),
        takeaway_available: payload.takeaway_available.unwrap_or(false),
        has_vegetarian_options: false,
        is_active: true,
        is_verified: false,
        is_featured: false,
        qr_code,
        average_rating: 0.0,
        total_reviews: 0,
        total_orders: 0,
        created_at: Utc::now(),
    };

    let repo = RestaurantRepository::new(state.db.clone());
    let created = repo.create(restaurant).await?;
    Ok(ok_with_message(created, "Restaurant created"))
}

/// PUT /api/restaurants/{id} - 更新餐厅
pub async fn update(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(payload): Json<RestaurantUpdate>,
) -> AppResult<Json<AppResponse<Restaurant>>> {
    let restaurant_id = parse_ref("restaurant", &id)?;
    if !actor.is_owner_of(&restaurant_id) {
        return Err(AppError::forbidden("Not your restaurant"));
    }
    payload.validate()?;

    let repo = RestaurantRepository::new(state.db.clone());
    let updated = repo.update(&restaurant_id.to_string(), payload).await?;
    Ok(ok(updated))
}

/// DELETE /api/restaurants/{id} - 下架餐厅（软删除）
pub async fn remove(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let restaurant_id = parse_ref("restaurant", &id)?;
    if !actor.is_owner_of(&restaurant_id) {
        return Err(AppError::forbidden("Not your restaurant"));
    }

    let repo = RestaurantRepository::new(state.db.clone());
    repo.deactivate(&restaurant_id).await?;
    Ok(ok_with_message((), "Restaurant deactivated"))
}
