//! Coupon Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

/// 适用人群
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicableFor {
    All,
    NewUsers,
    ExistingUsers,
}

/// Per-user usage ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponUse {
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub count: i32,
}

/// Coupon entity
///
/// code 以大写规范化存储，全局唯一。
/// 校验只读；用量账本仅在订单完成时由 redeem 变更。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub code: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(default)]
    pub min_order_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<i32>,
    #[serde(default)]
    pub usage_count: i32,
    /// 单用户可用次数，默认 1
    #[serde(default = "default_user_limit")]
    pub user_usage_limit: i32,
    #[serde(default)]
    pub used_by: Vec<CouponUse>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_or_true"
    )]
    pub is_active: bool,
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    #[serde(default = "default_applicable")]
    pub applicable_for: ApplicableFor,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

fn default_user_limit() -> i32 {
    1
}

fn default_applicable() -> ApplicableFor {
    ApplicableFor::All
}

// === API Request Types ===

/// Create coupon payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CouponCreate {
    #[validate(length(min = 3, max = 20))]
    pub code: String,
    #[validate(length(min = 5, max = 200))]
    pub description: String,
    pub discount_type: DiscountType,
    #[validate(range(min = 0.01))]
    pub discount_value: f64,
    #[validate(range(min = 0.0))]
    pub min_order_amount: Option<f64>,
    #[validate(range(min = 0.01))]
    pub max_discount_amount: Option<f64>,
    #[validate(range(min = 1))]
    pub usage_limit: Option<i32>,
    #[validate(range(min = 1))]
    pub user_usage_limit: Option<i32>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub applicable_for: Option<ApplicableFor>,
}

/// Update coupon payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CouponUpdate {
    #[validate(length(min = 5, max = 200))]
    pub description: Option<String>,
    #[validate(range(min = 0.01))]
    pub discount_value: Option<f64>,
    #[validate(range(min = 0.0))]
    pub min_order_amount: Option<f64>,
    #[validate(range(min = 0.01))]
    pub max_discount_amount: Option<f64>,
    #[validate(range(min = 1))]
    pub usage_limit: Option<i32>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

/// Validate coupon payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponValidate {
    pub code: String,
    pub restaurant_id: String,
    pub order_amount: f64,
}

/// Coupon validation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponQuote {
    pub discount_amount: f64,
    pub final_amount: f64,
}
