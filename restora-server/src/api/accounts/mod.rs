//! Account API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/accounts/register | POST | 注册账号 |
//! | /api/accounts/me | GET | 当前账号画像 |
//! | /api/accounts/forgot-password | POST | 发起密码重置 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/accounts", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/me", get(handler::me))
        .route("/forgot-password", post(handler::forgot_password))
}
