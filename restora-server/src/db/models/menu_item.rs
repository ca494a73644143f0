//! Menu Item Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// 菜品分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenuCategory {
    Appetizer,
    MainCourse,
    Dessert,
    Beverage,
    Salad,
    Soup,
    SideDish,
    Special,
}

/// Menu item entity
///
/// `total_orders` 在订单创建时按数量递增，单调不回退。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub category: MenuCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_or_false")]
    pub is_vegetarian: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_or_false")]
    pub is_vegan: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_or_false")]
    pub is_gluten_free: bool,
    /// 辣度 0-5
    #[serde(default)]
    pub spicy_level: i32,
    /// 制作时长（分钟）
    #[serde(default = "default_prep_time")]
    pub preparation_time: i32,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_or_true"
    )]
    pub is_available: bool,
    #[serde(default)]
    pub total_orders: i64,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

fn default_prep_time() -> i32 {
    15
}

// === API Request Types ===

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuItemCreate {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0.01))]
    pub price: f64,
    pub category: MenuCategory,
    pub image: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub is_vegetarian: Option<bool>,
    pub is_vegan: Option<bool>,
    pub is_gluten_free: Option<bool>,
    #[validate(range(min = 0, max = 5))]
    pub spicy_level: Option<i32>,
    #[validate(range(min = 1))]
    pub preparation_time: Option<i32>,
    pub is_available: Option<bool>,
}

/// Update menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuItemUpdate {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0.01))]
    pub price: Option<f64>,
    pub category: Option<MenuCategory>,
    pub image: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub is_vegetarian: Option<bool>,
    pub is_vegan: Option<bool>,
    pub is_gluten_free: Option<bool>,
    #[validate(range(min = 0, max = 5))]
    pub spicy_level: Option<i32>,
    #[validate(range(min = 1))]
    pub preparation_time: Option<i32>,
    pub is_available: Option<bool>,
}
