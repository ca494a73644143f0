//! 访问控制模块
//!
//! 身份由网关注入的请求头解析，令牌签发不在本服务范围内：
//! - [`Actor`] - 请求主体（顾客或店主）
//! - 归属谓词 - 按记录 ID 值比较资源归属
//! - [`extractor`] - axum `FromRequestParts` 实现

pub mod actor;
pub mod extractor;

pub use actor::Actor;
pub use extractor::{USER_ID_HEADER, USER_ROLE_HEADER};
