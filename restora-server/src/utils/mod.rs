//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型
//! - [`AppResponse`] - API 响应结构
//! - 日志、时间等工具

pub mod error;
pub mod ids;
pub mod logger;
pub mod result;
pub mod time;

pub use error::{AppError, AppResponse};
pub use error::{ok, ok_with_message};
pub use ids::parse_ref;
pub use result::AppResult;
