//! Reservation Model

use super::serde_helpers;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl ReservationStatus {
    /// Wire name, matches the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
            ReservationStatus::NoShow => "no-show",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TablePreference {
    Any,
    Indoor,
    Outdoor,
    Balcony,
    PrivateRoom,
}

/// Reservation entity
///
/// 无严格状态机：商家可设任意状态，顾客仅可在未取消时取消。
/// 联系方式在创建时快照，后续用户资料变更不影响已有预约。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub date: NaiveDate,
    /// HH:MM
    pub time: String,
    pub party_size: i32,
    #[serde(default = "default_preference")]
    pub table_preference: TablePreference,
    #[serde(default = "default_status")]
    pub status: ReservationStatus,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub assigned_table: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_request: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn default_preference() -> TablePreference {
    TablePreference::Any
}

fn default_status() -> ReservationStatus {
    ReservationStatus::Pending
}

// === API Request Types ===

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReservationCreate {
    pub restaurant_id: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub time: String,
    #[validate(range(min = 1, max = 20))]
    pub party_size: i32,
    pub table_preference: Option<TablePreference>,
    #[validate(length(max = 500))]
    pub special_request: Option<String>,
}

/// Owner status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationStatusUpdate {
    pub status: ReservationStatus,
    pub table_id: Option<String>,
}

/// Cancel reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCancel {
    pub reason: Option<String>,
}
