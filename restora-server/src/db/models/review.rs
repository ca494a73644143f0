//! Review Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// 商家回复
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerResponse {
    pub text: String,
    pub responded_at: DateTime<Utc>,
}

/// Review entity
///
/// 每个 (customer, order) 至多一条评论；关联订单必须已完成且属于该评论人。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub order: Option<RecordId>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub menu_item: Option<RecordId>,
    pub rating: i32,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambiance_rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<OwnerResponse>,
    #[serde(default)]
    pub helpful_count: i64,
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub helpful_by: Vec<RecordId>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_or_true"
    )]
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

// === API Request Types ===

/// Create review payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewCreate {
    pub restaurant_id: String,
    pub order_id: Option<String>,
    pub menu_item_id: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(min = 10, max = 500))]
    pub comment: String,
    #[validate(range(min = 1, max = 5))]
    pub food_rating: Option<i32>,
    #[validate(range(min = 1, max = 5))]
    pub service_rating: Option<i32>,
    #[validate(range(min = 1, max = 5))]
    pub ambiance_rating: Option<i32>,
}

/// Update review payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewUpdate {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[validate(length(min = 10, max = 500))]
    pub comment: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub food_rating: Option<i32>,
    #[validate(range(min = 1, max = 5))]
    pub service_rating: Option<i32>,
    #[validate(range(min = 1, max = 5))]
    pub ambiance_rating: Option<i32>,
}

/// Owner response payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewResponse {
    #[validate(length(min = 1, max = 500))]
    pub response: String,
}
