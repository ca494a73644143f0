//! 服务层 - 业务规则所在地
//!
//! # 服务列表
//!
//! - [`AccountService`] - 注册、身份查询、密码重置
//! - [`AggregateService`] - 评分聚合与只增计数器
//! - [`CouponService`] - 优惠券校验与核销
//! - [`ChatService`] - 会话与未读计数
//! - [`NotificationService`] - 站内通知与推送
//! - [`ReservationService`] - 预订流转
//! - [`ReviewService`] - 评论、商家回复与评分联动
//!
//! 订单生命周期单独在 [`crate::orders`]。服务持有仓储、事件总线
//! 与外协通道的共享引用，Clone 即浅拷贝。

pub mod accounts;
pub mod aggregates;
pub mod chats;
pub mod coupons;
pub mod notifications;
pub mod notifier;
pub mod reservations;
pub mod reviews;

pub use accounts::{AccountService, Profile};
pub use aggregates::AggregateService;
pub use chats::ChatService;
pub use coupons::CouponService;
pub use notifications::NotificationService;
pub use notifier::{DisabledEmailSender, EmailSender, LogEmailSender, LogPushSender, PushSender};
pub use reservations::ReservationService;
pub use reviews::ReviewService;
