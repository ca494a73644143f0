//! Dining Table Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableLocation {
    Indoor,
    Outdoor,
    Balcony,
    PrivateRoom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
    Maintenance,
}

/// Dining table entity (桌台)
///
/// (restaurant, number) 唯一；堂食订单占用时写入 current_order。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    pub number: i32,
    #[serde(default = "default_capacity")]
    pub capacity: i32,
    #[serde(default = "default_location")]
    pub location: TableLocation,
    #[serde(default = "default_status")]
    pub status: TableStatus,
    /// TABLE-{restaurant}-{number}-{ts}
    pub qr_code: String,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_or_true"
    )]
    pub is_active: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub current_order: Option<RecordId>,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

fn default_capacity() -> i32 {
    4
}

fn default_location() -> TableLocation {
    TableLocation::Indoor
}

fn default_status() -> TableStatus {
    TableStatus::Available
}

// === API Request Types ===

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiningTableCreate {
    #[validate(range(min = 1))]
    pub number: i32,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    pub location: Option<TableLocation>,
}

/// Update dining table payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiningTableUpdate {
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    pub location: Option<TableLocation>,
    pub is_active: Option<bool>,
}

/// Table status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStatusUpdate {
    pub status: TableStatus,
}
