//! Chat API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/chat | GET | 我的会话列表 | 用户 |
//! | /api/chat/unread-count | GET | 所有会话未读总数 | 用户 |
//! | /api/chat/open | POST | 找到或建立会话 | 用户 |
//! | /api/chat/order/{order_id} | GET | 订单会话（找到或建立） | 当事人 |
//! | /api/chat/{id}/messages | GET | 会话消息 | 参与者 |
//! | /api/chat/{id}/messages | POST | 发送消息 | 参与者 |
//! | /api/chat/{id}/read | PUT | 全部标记已读 | 参与者 |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/chat", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/unread-count", get(handler::unread_count))
        .route("/open", post(handler::open))
        .route("/order/{order_id}", get(handler::open_for_order))
        .route(
            "/{id}/messages",
            get(handler::messages).post(handler::send_message),
        )
        .route("/{id}/read", put(handler::mark_read))
}
