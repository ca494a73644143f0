//! Restaurant Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// 餐厅地址
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Address {
    #[validate(length(min = 1, max = 200))]
    pub street: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
}

/// 单日营业时间
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningHours {
    /// 星期几，小写英文 (monday..sunday)
    pub day: String,
    pub open: String,
    pub close: String,
    #[serde(default, deserialize_with = "serde_helpers::bool_or_false")]
    pub is_closed: bool,
}

/// Restaurant entity
///
/// `average_rating` / `total_reviews` 每次评论写入后全量重算，
/// `total_orders` 单调递增（取消不回退）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Owning user (one restaurant per owner)
    #[serde(with = "serde_helpers::record_id")]
    pub owner: RecordId,
    pub name: String,
    pub description: String,
    pub cuisine: String,
    /// 价位档次 1-4
    pub price_range: i32,
    pub address: Address,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub opening_hours: Vec<OpeningHours>,
    #[serde(default)]
    pub seating_capacity: i32,
    #[serde(default, deserialize_with = "serde_helpers::bool_or_false")]
    pub delivery_available: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_or_false")]
    pub takeaway_available: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_or_false")]
    pub has_vegetarian_options: bool,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_or_true"
    )]
    pub is_active: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_or_false")]
    pub is_verified: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_or_false")]
    pub is_featured: bool,
    /// 全局唯一二维码标识 RESTORA-{id}-{ts}
    pub qr_code: String,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_reviews: i64,
    #[serde(default)]
    pub total_orders: i64,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

// === API Request Types ===

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RestaurantCreate {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 10, max = 1000))]
    pub description: String,
    #[validate(length(min = 2, max = 50))]
    pub cuisine: String,
    #[validate(range(min = 1, max = 4))]
    pub price_range: i32,
    #[validate(nested)]
    pub address: Address,
    #[validate(length(min = 5, max = 20))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
    pub opening_hours: Option<Vec<OpeningHours>>,
    #[validate(range(min = 1))]
    pub seating_capacity: Option<i32>,
    pub delivery_available: Option<bool>,
    pub takeaway_available: Option<bool>,
}

/// Update restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RestaurantUpdate {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 10, max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 2, max = 50))]
    pub cuisine: Option<String>,
    #[validate(range(min = 1, max = 4))]
    pub price_range: Option<i32>,
    #[validate(nested)]
    pub address: Option<Address>,
    #[validate(length(min = 5, max = 20))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub opening_hours: Option<Vec<OpeningHours>>,
    #[validate(range(min = 1))]
    pub seating_capacity: Option<i32>,
    pub delivery_available: Option<bool>,
    pub takeaway_available: Option<bool>,
    pub is_active: Option<bool>,
}
