//! 应用错误与统一响应信封
//!
//! 所有 HTTP 出口共用一个信封：`{code, message, data}`，
//! 成功固定 `E0000`，失败由 [`AppError`] 的变体决定码值与状态码。
//!
//! # 码段划分
//!
//! | 码段 | 含义 |
//! |------|------|
//! | E0xxx | 业务拒绝 (校验、不存在、状态冲突) |
//! | E2xxx | 权限不足 |
//! | E3xxx | 身份缺失 |
//! | E9xxx | 系统侧失败 (数据库、内部、上游) |
//!
//! 数据库与内部错误的真实原因只进日志，响应里是笼统文案。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

const SUCCESS_CODE: &str = "E0000";

/// API 统一响应结构
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl<T: Serialize> AppResponse<T> {
    fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE.into(),
            message: "Success".into(),
            data: Some(data),
            trace_id: None,
        }
    }
}

/// 应用错误枚举
///
/// 4xx 与 Upstream 变体携带的消息原样进响应；
/// Database/Internal 的消息只进日志。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 未登录 (401)
    #[error("Authentication required")]
    Unauthorized,

    /// 无权限 (403)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// 资源不存在 (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// 状态冲突或重复资源 (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 验证失败 (400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 下游服务失败，如邮件网关 (502)
    #[error("Upstream service error: {0}")]
    Upstream(String),

    /// 数据库错误 (500)
    #[error("Database error: {0}")]
    Database(String),

    /// 内部错误 (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// 状态码、错误码与对外消息
    fn response_parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "E3001",
                "Please login first".into(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "E9003", msg.clone()),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "E9002",
                "Database error".into(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "E9001",
                "Internal server error".into(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Upstream(msg) => {
                error!(target: "upstream", error = %msg, "Upstream service failure")
            }
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred")
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred")
            }
            _ => {}
        }

        let (status, code, message) = self.response_parts();
        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
            trace_id: None,
        });

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

// ========== Helper functions ==========

/// 成功响应
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse::success(data))
}

/// 成功响应，带自定义消息
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    let mut response = AppResponse::success(data);
    response.message = message.into();
    Json(response)
}
