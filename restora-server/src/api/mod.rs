//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`accounts`] - 账号注册与身份
//! - [`restaurants`] - 餐厅管理
//! - [`menu`] - 菜单管理
//! - [`orders`] - 订单生命周期
//! - [`reviews`] - 评论与商家回复
//! - [`coupons`] - 优惠券管理与校验
//! - [`tables`] - 桌台管理
//! - [`reservations`] - 预订管理
//! - [`chat`] - 会话与消息
//! - [`notifications`] - 站内通知
//!
//! 除健康检查与公开浏览接口外，所有路由经由
//! [`crate::auth::Actor`] 提取器解析请求身份。

pub mod health;

pub mod accounts;
pub mod chat;
pub mod coupons;
pub mod menu;
pub mod notifications;
pub mod orders;
pub mod reservations;
pub mod restaurants;
pub mod reviews;
pub mod tables;

use serde::{Deserialize, Serialize};

use crate::db::repository::Pagination;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// 分页查询参数，默认第 1 页每页 20 条
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

impl ListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }
}

/// 分页响应
#[derive(Debug, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        Self {
            items,
            total,
            page,
            limit,
        }
    }
}
