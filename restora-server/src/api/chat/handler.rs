//! Chat API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::auth::Actor;
use crate::core::ServerState;
use crate::db::models::{Chat, ChatMessage, ChatOpen, ChatSendMessage, UnreadCount};
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

/// GET /api/chat - 我的会话列表
pub async fn list(
    State(state): State<ServerState>,
    actor: Actor,
) -> AppResult<Json<AppResponse<Vec<Chat>>>> {
    let chats = state.chats.list(&actor).await?;
    Ok(ok(chats))
}

/// GET /api/chat/unread-count - 所有会话的未读总数
pub async fn unread_count(
    State(state): State<ServerState>,
    actor: Actor,
) -> AppResult<Json<AppResponse<UnreadCount>>> {
    let count = state.chats.unread_total(&actor).await?;
    Ok(ok(UnreadCount { count }))
}

/// POST /api/chat/open - 找到或建立会话
pub async fn open(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<ChatOpen>,
) -> AppResult<Json<AppResponse<Chat>>> {
    let chat = state.chats.open(&actor, payload).await?;
    Ok(ok(chat))
}

/// GET /api/chat/order/{order_id} - 订单会话
pub async fn open_for_order(
    State(state): State<ServerState>,
    actor: Actor,
    Path(order_id): Path<String>,
) -> AppResult<Json<AppResponse<Chat>>> {
    let chat = state.chats.open_for_order(&actor, &order_id).await?;
    Ok(ok(chat))
}

/// GET /api/chat/{id}/messages - 会话消息
pub async fn messages(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<ChatMessage>>>> {
    let messages = state.chats.messages(&actor, &id).await?;
    Ok(ok(messages))
}

/// POST /api/chat/{id}/messages - 发送消息
pub async fn send_message(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(payload): Json<ChatSendMessage>,
) -> AppResult<Json<AppResponse<Chat>>> {
    payload.validate()?;
    let chat = state.chats.send_message(&actor, &id, payload).await?;
    Ok(ok_with_message(chat, "Message sent"))
}

/// PUT /api/chat/{id}/read - 全部标记已读
pub async fn mark_read(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Chat>>> {
    let chat = state.chats.mark_read(&actor, &id).await?;
    Ok(ok(chat))
}
