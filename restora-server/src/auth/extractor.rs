//! Actor Extractor
//!
//! Custom extractor resolving the request actor from gateway-injected
//! identity headers. Token issuance and verification live upstream.

use axum::{extract::FromRequestParts, http::request::Parts};
use surrealdb::RecordId;

use crate::auth::Actor;
use crate::core::ServerState;
use crate::db::models::UserRole;
use crate::db::repository::{RestaurantRepository, UserRepository};
use crate::utils::{AppError, parse_ref};

/// Header carrying the caller's user record id
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's role (`customer` | `restaurant`)
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// 身份头里的 ID 解析失败一律按未认证处理
fn parse_user_id(raw: &str) -> Result<RecordId, AppError> {
    parse_ref("user", raw).map_err(|_| AppError::Unauthorized)
}

impl FromRequestParts<ServerState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (earlier extractor run on this request)
        if let Some(actor) = parts.extensions.get::<Actor>() {
            return Ok(actor.clone());
        }

        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let raw_id = header(USER_ID_HEADER).ok_or(AppError::Unauthorized)?;
        let raw_role = header(USER_ROLE_HEADER).ok_or(AppError::Unauthorized)?;
        let user_id = parse_user_id(raw_id)?;

        // 账号必须存在且未停用
        let users = UserRepository::new(state.db.clone());
        let user = users
            .find_by_id(&user_id.to_string())
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::Unauthorized)?;
        if !user.is_active {
            tracing::warn!(user = %user_id, uri = %parts.uri, "Inactive account rejected");
            return Err(AppError::Unauthorized);
        }

        // 声明角色与存量角色不一致按伪造处理
        let claimed = match raw_role {
            "customer" => UserRole::Customer,
            "restaurant" => UserRole::Restaurant,
            _ => return Err(AppError::Unauthorized),
        };
        if claimed != user.role {
            tracing::warn!(user = %user_id, claimed = raw_role, "Role mismatch rejected");
            return Err(AppError::Unauthorized);
        }

        let actor = match user.role {
            UserRole::Customer => Actor::Customer { id: user_id },
            UserRole::Restaurant => {
                let restaurants = RestaurantRepository::new(state.db.clone());
                let restaurant = restaurants
                    .find_by_owner(&user_id)
                    .await
                    .map_err(AppError::from)?;
                Actor::Owner {
                    id: user_id,
                    restaurant_id: restaurant.and_then(|r| r.id),
                }
            }
        };

        // Store in extensions for potential reuse
        parts.extensions.insert(actor.clone());

        Ok(actor)
    }
}
