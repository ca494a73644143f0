//! 事件总线核心实现
//!
//! # 消息流
//!
//! ```text
//! OrderService ──▶ publish() ──▶ broadcast::Sender ──▶ Subscribers
//!                                      ▲
//!                 subscribe() ─────────┘ (按频道惰性创建)
//! ```
//!
//! 每个频道对应一个独立的 broadcast 通道，发布端不关心
//! 是否有订阅者在线，离线期间的事件直接丢弃。

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Capacity of each broadcast channel (default: 1024)
const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// 事件频道
///
/// 频道名由资源类型和裸 ID 组成，例如 `restaurant-abc123`。
/// 调用方传入的 ID 是 RecordId 的 key 部分，不含表名前缀。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Channel {
    /// 餐厅维度: 新订单、预订、评价
    Restaurant(String),
    /// 订单维度: 状态推进、取消
    Order(String),
    /// 用户维度: 通知、聊天消息
    User(String),
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Restaurant(id) => write!(f, "restaurant-{}", id),
            Channel::Order(id) => write!(f, "order-{}", id),
            Channel::User(id) => write!(f, "user-{}", id),
        }
    }
}

/// 广播事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// 频道名 (如 `order-abc123`)
    pub channel: String,
    /// 事件名 (如 `order-status-updated`)
    pub name: String,
    /// 事件负载
    pub payload: serde_json::Value,
}

impl Event {
    /// 创建新事件
    pub fn new(channel: &Channel, name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            channel: channel.to_string(),
            name: name.into(),
            payload,
        }
    }
}

/// 事件总线 - 负责按频道路由事件
///
/// # 职责
///
/// - 事件发布 (publish)
/// - 订阅管理 (subscribe, 频道惰性创建)
///
/// Clone 共享同一组底层通道。
#[derive(Debug, Clone)]
pub struct EventBus {
    /// 频道注册表 (频道名 -> 发送端)
    channels: Arc<DashMap<String, broadcast::Sender<Event>>>,
    /// 每个频道的缓冲容量
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// 创建默认容量的事件总线
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// 创建指定容量的事件总线
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(DashMap::new()),
            capacity,
        }
    }

    /// 发布事件到对应频道
    ///
    /// 没有订阅者时事件被丢弃，发布方永远不会因此失败。
    pub fn publish(&self, event: Event) {
        if let Some(tx) = self.channels.get(&event.channel) {
            // SendError 只在零订阅者时出现，忽略即可
            let _ = tx.send(event);
        }
    }

    /// 订阅指定频道
    ///
    /// 频道不存在时惰性创建，订阅者只收到订阅之后发布的事件。
    pub fn subscribe(&self, channel: &Channel) -> broadcast::Receiver<Event> {
        self.channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// 当前频道的订阅者数量 (测试与诊断用)
    pub fn subscriber_count(&self, channel: &Channel) -> usize {
        self.channels
            .get(&channel.to_string())
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}
