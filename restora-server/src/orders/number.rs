//! 订单号分配
//!
//! `ORD{毫秒时间戳}{三位序号}`，同一毫秒内并发下单靠序号区分。

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Allocate the next order number
pub fn next_order_number() -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed) % 1000;
    format!("ORD{}{:03}", Utc::now().timestamp_millis(), seq)
}
