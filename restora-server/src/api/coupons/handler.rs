//! Coupon API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use validator::Validate;

use crate::api::{ListQuery, Paged};
use crate::auth::Actor;
use crate::core::ServerState;
use crate::db::models::{
    ApplicableFor, Coupon, CouponCreate, CouponQuote, CouponUpdate, CouponValidate,
};
use crate::db::repository::CouponRepository;
use crate::services::coupons::normalize_code;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message, parse_ref};

/// GET /api/coupons - 本店优惠券
pub async fn list(
    State(state): State<ServerState>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Paged<Coupon>>>> {
    let restaurant_id = actor.require_restaurant()?;
    let repo = CouponRepository::new(state.db.clone());

    let coupons = repo
        .find_by_restaurant(restaurant_id, query.pagination())
        .await?;
    let total = repo.count_by_restaurant(restaurant_id).await?;

    Ok(ok(Paged::new(coupons, total, query.page, query.limit)))
}

/// GET /api/coupons/{id} - 优惠券详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Coupon>>> {
    let coupon_id = parse_ref("coupon", &id)?;
    let repo = CouponRepository::new(state.db.clone());
    let coupon = repo
        .find_by_id(&coupon_id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Coupon not found"))?;
    if !actor.is_owner_of(&coupon.restaurant) {
        return Err(AppError::forbidden("Not your coupon"));
    }

    Ok(ok(coupon))
}

/// POST /api/coupons - 创建优惠券
pub async fn create(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<CouponCreate>,
) -> AppResult<Json<AppResponse<Coupon>>> {
    let restaurant_id = actor.require_restaurant()?.clone();
    payload.validate()?;
    if payload.valid_from >= payload.valid_until {
        return Err(AppError::validation("Validity window is inverted"));
    }

    let coupon = Coupon {
        id: None,
        code: normalize_code(&payload.code),
        description: payload.description,
        discount_type: payload.discount_type,
        discount_value: payload.discount_value,
        min_order_amount: payload.min_order_amount.unwrap_or(0.0),
        max_discount_amount: payload.max_discount_amount,
        usage_limit: payload.usage_limit,
        usage_count: 0,
        user_usage_limit: payload.user_usage_limit.unwrap_or(1),
        used_by: Vec::new(),
        valid_from: payload.valid_from,
        valid_until: payload.valid_until,
        is_active: true,
        restaurant: restaurant_id,
        applicable_for: payload.applicable_for.unwrap_or(ApplicableFor::All),
        created_at: Utc::now(),
    };

    let repo = CouponRepository::new(state.db.clone());
    let created = repo.create(coupon).await?;
    Ok(ok_with_message(created, "Coupon created"))
}

/// POST /api/coupons/validate - 校验优惠券
pub async fn validate(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<CouponValidate>,
) -> AppResult<Json<AppResponse<CouponQuote>>> {
    let restaurant_id = parse_ref("restaurant", &payload.restaurant_id)?;
    let quote = state
        .coupons
        .validate(
            &payload.code,
            &restaurant_id,
            actor.user_id(),
            payload.order_amount,
        )
        .await?;
    Ok(ok(quote))
}

/// PUT /api/coupons/{id} - 更新优惠券
pub async fn update(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(payload): Json<CouponUpdate>,
) -> AppResult<Json<AppResponse<Coupon>>> {
    let coupon_id = parse_ref("coupon", &id)?;
    let repo = CouponRepository::new(state.db.clone());
    let coupon = repo
        .find_by_id(&coupon_id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Coupon not found"))?;
    if !actor.is_owner_of(&coupon.restaurant) {
        return Err(AppError::forbidden("Not your coupon"));
    }
    payload.validate()?;

    let updated = repo.update(&coupon_id.to_string(), payload).await?;
    Ok(ok(updated))
}

/// DELETE /api/coupons/{id} - 删除优惠券
pub async fn remove(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let coupon_id = parse_ref("coupon", &id)?;
    let repo = CouponRepository::new(state.db.clone());
    let coupon = repo
        .find_by_id(&coupon_id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Coupon not found"))?;
    if !actor.is_owner_of(&coupon.restaurant) {
        return Err(AppError::forbidden("Not your coupon"));
    }

    repo.delete(&coupon_id.to_string()).await?;
    Ok(ok_with_message((), "Coupon deleted"))
}
