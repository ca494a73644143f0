//! Order API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/orders | POST | 下单 | 顾客 |
//! | /api/orders/my | GET | 我的订单 | 顾客 |
//! | /api/orders/restaurant | GET | 店侧订单（可按状态过滤） | 店主 |
//! | /api/orders/stats | GET | 订单统计 | 店主 |
//! | /api/orders/{id} | GET | 订单详情 | 当事人 |
//! | /api/orders/{id}/status | PUT | 推进订单状态 | 店主 |
//! | /api/orders/{id}/cancel | PUT | 取消订单 | 顾客 |
//! | /api/orders/{id}/rate | PUT | 订单评分 | 顾客 |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/my", get(handler::list_mine))
        .route("/restaurant", get(handler::list_for_restaurant))
        .route("/stats", get(handler::stats))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/cancel", put(handler::cancel))
        .route("/{id}/rate", put(handler::rate))
}
