//! Notification API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::{ListQuery, Paged};
use crate::auth::Actor;
use crate::core::ServerState;
use crate::db::models::{Notification, UnreadCount};
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

/// GET /api/notifications - 我的通知
pub async fn list(
    State(state): State<ServerState>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Paged<Notification>>>> {
    let (items, total) = state
        .notifications
        .list(&actor, query.pagination())
        .await?;
    Ok(ok(Paged::new(items, total, query.page, query.limit)))
}

/// GET /api/notifications/unread-count - 未读数
pub async fn unread_count(
    State(state): State<ServerState>,
    actor: Actor,
) -> AppResult<Json<AppResponse<UnreadCount>>> {
    let count = state.notifications.unread_count(&actor).await?;
    Ok(ok(UnreadCount { count }))
}

/// PUT /api/notifications/{id}/read - 标记已读
pub async fn mark_read(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Notification>>> {
    let notification = state.notifications.mark_read(&actor, &id).await?;
    Ok(ok(notification))
}

/// PUT /api/notifications/read-all - 全部标记已读
pub async fn mark_all_read(
    State(state): State<ServerState>,
    actor: Actor,
) -> AppResult<Json<AppResponse<()>>> {
    state.notifications.mark_all_read(&actor).await?;
    Ok(ok_with_message((), "All notifications marked as read"))
}

/// DELETE /api/notifications/{id} - 删除通知
pub async fn remove(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state.notifications.delete(&actor, &id).await?;
    Ok(ok_with_message((), "Notification deleted"))
}
