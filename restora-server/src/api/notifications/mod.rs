//! Notification API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/notifications | GET | 我的通知 | 用户 |
//! | /api/notifications/unread-count | GET | 未读数 | 用户 |
//! | /api/notifications/read-all | PUT | 全部标记已读 | 用户 |
//! | /api/notifications/{id}/read | PUT | 标记已读 | 用户 |
//! | /api/notifications/{id} | DELETE | 删除通知 | 用户 |

mod handler;

use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/unread-count", get(handler::unread_count))
        .route("/read-all", put(handler::mark_all_read))
        .route("/{id}/read", put(handler::mark_read))
        .route("/{id}", delete(handler::remove))
}
