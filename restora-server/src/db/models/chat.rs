//! Chat Model
//!
//! 消息内嵌在会话文档中；未读计数按参与者分别维护。

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    File,
}

/// Embedded chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// 消息内部 id (uuid v4)
    pub message_id: String,
    #[serde(with = "serde_helpers::record_id")]
    pub sender: RecordId,
    pub content: String,
    #[serde(default = "default_message_type")]
    pub message_type: MessageType,
    #[serde(default, deserialize_with = "serde_helpers::bool_or_false")]
    pub is_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

fn default_message_type() -> MessageType {
    MessageType::Text
}

/// Per-participant unread counter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadEntry {
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub count: i32,
}

/// Chat entity
///
/// 每个无序参与者对至多一个会话；find-or-create 两个方向返回同一条记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::vec_record_id")]
    pub participants: Vec<RecordId>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub restaurant: Option<RecordId>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub order: Option<RecordId>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub unread_counts: Vec<UnreadEntry>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_or_true"
    )]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Chat {
    /// 取某参与者的未读数，缺项视为 0
    pub fn unread_for(&self, user: &RecordId) -> i32 {
        self.unread_counts
            .iter()
            .find(|e| e.user == *user)
            .map(|e| e.count)
            .unwrap_or(0)
    }
}

// === API Request Types ===

/// Find-or-create chat payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOpen {
    pub participant_id: String,
    pub restaurant_id: Option<String>,
    pub order_id: Option<String>,
}

/// Send message payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatSendMessage {
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
    pub message_type: Option<MessageType>,
}
