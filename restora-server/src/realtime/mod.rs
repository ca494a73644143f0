//! 实时事件广播
//!
//! 订单状态、预订确认、聊天消息等变更通过进程内
//! 事件总线广播，订阅方持有 subscribe 句柄带外接入。

pub mod bus;

pub use bus::{Channel, Event, EventBus};
