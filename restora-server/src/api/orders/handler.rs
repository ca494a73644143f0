//! Order API Handlers
//!
//! 业务规则都在 [`crate::orders::OrderService`]，这里只做
//! 参数校验和身份传递。

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
    Order, OrderCancel, OrderCreate, OrderRate, OrderStats, OrderStatus, OrderStatusUpdate,
};
use crate::db::repository::Pagination;
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

/// 店侧订单列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct RestaurantOrdersQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub status: Option<OrderStatus>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

/// POST /api/orders - 下单
pub async fn create(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<AppResponse<Order>>> {
    payload.validate()?;
    let order = state.orders.create(&actor, payload).await?;
    Ok(ok_with_message(order, "Order placed"))
}

/// GET /api/orders/my - 我的订单
pub async fn list_mine(
    State(state): State<ServerState>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Paged<Order>>>> {
    let (orders, total) = state
        .orders
        .list_for_customer(&actor, query.pagination())
        .await?;
    Ok(ok(Paged::new(orders, total, query.page, query.limit)))
}

/// GET /api/orders/restaurant - 店侧订单
pub async fn list_for_restaurant(
    State(state): State<ServerState>,
    actor: Actor,
    Query(query): Query<RestaurantOrdersQuery>,
) -> AppResult<Json<AppResponse<Paged<Order>>>> {
    let page = Pagination::new(query.page, query.limit);
    let (orders, total) = state
        .orders
        .list_for_restaurant(&actor, query.status, page)
        .await?;
    Ok(ok(Paged::new(orders, total, query.page, query.limit)))
}

/// GET /api/orders/stats - 订单统计
pub async fn stats(
    State(state): State<ServerState>,
    actor: Actor,
) -> AppResult<Json<AppResponse<OrderStats>>> {
    let stats = state.orders.stats(&actor).await?;
    Ok(ok(stats))
}

/// GET /api/orders/{id} - 订单详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.get(&actor, &id).await?;
    Ok(ok(order))
}

/// PUT /api/orders/{id}/status - 推进订单状态
pub async fn update_status(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state
        .orders
        .advance_status(&actor, &id, payload.status)
        .await?;
    Ok(ok(order))
}

/// PUT /api/orders/{id}/cancel - 取消订单
pub async fn cancel(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(payload): Json<OrderCancel>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.cancel(&actor, &id, payload.reason).await?;
    Ok(ok_with_message(order, "Order cancelled"))
}

/// PUT /api/orders/{id}/rate - 订单评分
pub async fn rate(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(payload): Json<OrderRate>,
) -> AppResult<Json<AppResponse<Order>>> {
    payload.validate()?;
    let order = state.orders.rate(&actor, &id, payload).await?;
    Ok(ok_with_message(order, "Order rated"))
}
