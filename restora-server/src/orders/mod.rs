//! 订单域
//!
//! 订单生命周期的全部业务规则集中在这里：
//! - [`status`] - 状态机推进表
//! - [`money`] - 金额计算（Decimal 运算，2dp 落库）
//! - [`number`] - 订单号分配
//! - [`service`] - 下单、推进、取消、评分、统计

pub mod money;
pub mod number;
pub mod service;
pub mod status;

pub use service::OrderService;
