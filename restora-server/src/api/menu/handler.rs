//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use crate::api::Paged;
use crate::auth::Actor;
use crate::core::ServerState;
use crate::db::models::{MenuCategory, MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::db::repository::{MenuFilter, MenuItemRepository, Pagination};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message, parse_ref};

/// 菜单浏览查询参数
///
/// 下架菜品默认不出现在列表里，店主管理菜单时传
/// `include_unavailable=true`。
#[derive(Debug, Default, Deserialize)]
pub struct MenuListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub category: Option<MenuCategory>,
    #[serde(default)]
    pub vegetarian: bool,
    #[serde(default)]
    pub include_unavailable: bool,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

impl MenuListQuery {
    fn filter(&self) -> MenuFilter {
        MenuFilter {
            category: self.category,
            vegetarian_only: self.vegetarian,
            available_only: !self.include_unavailable,
        }
    }
}

/// GET /api/restaurants/{id}/menu - 餐厅菜单
pub async fn list_for_restaurant(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<MenuListQuery>,
) -> AppResult<Json<AppResponse<Paged<MenuItem>>>> {
    let restaurant_id = parse_ref("restaurant", &id)?;
    let repo = MenuItemRepository::new(state.db.clone());
    let filter = query.filter();
    let page = Pagination::new(query.page, query.limit);

    let items = repo.find_by_restaurant(&restaurant_id, &filter, page).await?;
    let total = repo.count_by_restaurant(&restaurant_id, &filter).await?;

    Ok(ok(Paged::new(items, total, query.page, query.limit)))
}

/// GET /api/menu/{id} - 菜品详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    let item_id = parse_ref("menu_item", &id)?;
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo
        .find_by_id(&item_id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Menu item not found"))?;
    Ok(ok(item))
}

/// POST /api/menu - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    let restaurant_id = actor.require_restaurant()?.clone();
    payload.validate()?;

    let is_vegetarian = payload.is_vegetarian.unwrap_or(false);
    let item = MenuItem {
        id: None,
        restaurant: restaurant_id.clone(),
        name: payload.name,
        description: payload.description,
        price: payload.price,
        category: payload.category,
        image: payload.image,
        ingredients: payload.ingredients.unwrap_or_default(),
        is_vegetarian,
        is_vegan: payload.is_vegan.unwrap_or(false),
        is_gluten_free: payload.is_gluten_free.unwrap_or(false),
        spicy_level: payload.spicy_level.unwrap_or(0),
        preparation_time: payload.preparation_time.unwrap_or(15),
        is_available: payload.is_available.unwrap_or(true),
        total_orders: 0,
        created_at: Utc::now(),
    };

    let repo = MenuItemRepository::new(state.db.clone());
    let created = repo.create(item).await?;

    if is_vegetarian {
        state
            .aggregates
            .flag_vegetarian_options(&restaurant_id)
            .await?;
    }

    Ok(ok_with_message(created, "Menu item created"))
}

/// PUT /api/menu/{id} - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    let item_id = parse_ref("menu_item", &id)?;
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo
        .find_by_id(&item_id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Menu item not found"))?;
    if !actor.is_owner_of(&item.restaurant) {
        return Err(AppError::forbidden("Not your menu item"));
    }
    payload.validate()?;

    let turned_vegetarian = payload.is_vegetarian == Some(true);
    let updated = repo.update(&item_id.to_string(), payload).await?;

    if turned_vegetarian {
        state
            .aggregates
            .flag_vegetarian_options(&item.restaurant)
            .await?;
    }

    Ok(ok(updated))
}

/// DELETE /api/menu/{id} - 删除菜品
pub async fn remove(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let item_id = parse_ref("menu_item", &id)?;
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo
        .find_by_id(&item_id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Menu item not found"))?;
    if !actor.is_owner_of(&item.restaurant) {
        return Err(AppError::forbidden("Not your menu item"));
    }

    repo.delete(&item_id.to_string()).await?;
    Ok(ok_with_message((), "Menu item deleted"))
}
