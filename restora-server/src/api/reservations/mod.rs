//! Reservation API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/reservations | POST | 预订 | 顾客 |
//! | /api/reservations/my | GET | 我的预订 | 顾客 |
//! | /api/reservations/restaurant | GET | 店侧预订（可按状态过滤） | 店主 |
//! | /api/reservations/{id} | GET | 预订详情 | 当事人 |
//! | /api/reservations/{id}/status | PUT | 更新预订状态（可指派桌台） | 店主 |
//! | /api/reservations/{id}/cancel | PUT | 取消预订 | 顾客 |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/my", get(handler::list_mine))
        .route("/restaurant", get(handler::list_for_restaurant))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/cancel", put(handler::cancel))
}
