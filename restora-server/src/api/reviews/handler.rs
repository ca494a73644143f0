//! Review API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::api::{ListQuery, Paged};
use crate::auth::Actor;
use crate::core::ServerState;
use crate::db::models::{Review, ReviewCreate, ReviewResponse, ReviewUpdate};
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

/// GET /api/restaurants/{id}/reviews - 餐厅评论
pub async fn list_for_restaurant(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Paged<Review>>>> {
    let (reviews, total) = state
        .reviews
        .list_for_restaurant(&id, query.pagination())
        .await?;
    Ok(ok(Paged::new(reviews, total, query.page, query.limit)))
}

/// GET /api/reviews/my - 我的评论
pub async fn list_mine(
    State(state): State<ServerState>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Review>>>> {
    let reviews = state
        .reviews
        .list_for_customer(&actor, query.pagination())
        .await?;
    Ok(ok(reviews))
}

/// GET /api/reviews/{id} - 评论详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Review>>> {
    let review = state.reviews.get(&id).await?;
    Ok(ok(review))
}

/// POST /api/reviews - 发表评论
pub async fn create(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<Json<AppResponse<Review>>> {
    payload.validate()?;
    let review = state.reviews.create(&actor, payload).await?;
    Ok(ok_with_message(review, "Review published"))
}

/// PUT /api/reviews/{id} - 修改评论
pub async fn update(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(payload): Json<ReviewUpdate>,
) -> AppResult<Json<AppResponse<Review>>> {
    payload.validate()?;
    let review = state.reviews.update(&actor, &id, payload).await?;
    Ok(ok(review))
}

/// DELETE /api/reviews/{id} - 删除评论
pub async fn remove(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state.reviews.delete(&actor, &id).await?;
    Ok(ok_with_message((), "Review deleted"))
}

/// PUT /api/reviews/{id}/respond - 商家回复
pub async fn respond(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(payload): Json<ReviewResponse>,
) -> AppResult<Json<AppResponse<Review>>> {
    payload.validate()?;
    let review = state.reviews.respond(&actor, &id, payload).await?;
    Ok(ok(review))
}

/// PUT /api/reviews/{id}/helpful - 点"有用"
pub async fn mark_helpful(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Review>>> {
    let review = state.reviews.mark_helpful(&actor, &id).await?;
    Ok(ok(review))
}
