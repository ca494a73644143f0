//! Account API Handlers

use axum::{Json, extract::State};
use validator::Validate;

use crate::auth::Actor;
use crate::core::ServerState;
use crate::db::models::{ForgotPasswordRequest, RegisterRequest, User};
use crate::services::Profile;
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

/// POST /api/accounts/register - 注册账号
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<AppResponse<User>>> {
    payload.validate()?;
    let user = state.accounts.register(payload).await?;
    Ok(ok_with_message(user, "Account registered"))
}

/// GET /api/accounts/me - 当前账号画像
pub async fn me(
    State(state): State<ServerState>,
    actor: Actor,
) -> AppResult<Json<AppResponse<Profile>>> {
    let profile = state.accounts.me(&actor).await?;
    Ok(ok(profile))
}

/// POST /api/accounts/forgot-password - 发起密码重置
pub async fn forgot_password(
    State(state): State<ServerState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> AppResult<Json<AppResponse<()>>> {
    payload.validate()?;
    state.accounts.forgot_password(payload).await?;
    Ok(ok_with_message((), "Password reset email sent"))
}
