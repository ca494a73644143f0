//! 通用 Result 别名

use crate::utils::AppError;

/// 服务与处理器统一的返回类型
pub type AppResult<T> = Result<T, AppError>;
