//! Order Model
//!
//! 订单为只增不删的文档：状态历史追加、金额字段每次写前重算。

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

// =============================================================================
// Enums
// =============================================================================

/// Order status
///
/// 状态机定义见 [`crate::orders::status`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Received,
    Preparing,
    Ready,
    Served,
    Completed,
    Cancelled,
}

/// Order fulfilment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    DineIn,
    Takeaway,
    Delivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Online,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

/// 取消方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelledBy {
    Customer,
    Restaurant,
}

// =============================================================================
// Order
// =============================================================================

/// Order line item with captured menu snapshot
///
/// name/price 在下单时从 MenuItem 快照，之后菜单改价不影响历史订单。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub menu_item: RecordId,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Status history entry (append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// ORD{epoch-ms}{seq}，创建时分配
    pub order_number: String,
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i32>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    /// Σ price × quantity
    pub total_amount: f64,
    /// 10% of total_amount
    pub tax_amount: f64,
    #[serde(default)]
    pub delivery_fee: f64,
    #[serde(default)]
    pub discount_amount: f64,
    /// total + tax + delivery − discount
    pub final_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    /// 预计完成分钟数 = max(preparation_time) + 5
    pub estimated_time: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    pub status_history: Vec<StatusHistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<CancelledBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// API Request Types
// =============================================================================

/// Line item in a create-order request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemRequest {
    pub menu_item_id: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub special_instructions: Option<String>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    pub restaurant_id: String,
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderItemRequest>,
    pub order_type: OrderType,
    pub table_number: Option<i32>,
    pub payment_method: PaymentMethod,
    #[validate(range(min = 0.0))]
    pub delivery_fee: Option<f64>,
    pub coupon_code: Option<String>,
    pub special_instructions: Option<String>,
}

/// Status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Cancel order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCancel {
    pub reason: Option<String>,
}

/// Rate order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderRate {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(max = 500))]
    pub review: Option<String>,
}

/// Per-restaurant order statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderStats {
    pub total_orders: i64,
    pub pending: i64,
    pub received: i64,
    pub preparing: i64,
    pub ready: i64,
    pub served: i64,
    pub completed: i64,
    pub cancelled: i64,
    /// Σ final_amount over completed orders
    pub total_revenue: f64,
}
