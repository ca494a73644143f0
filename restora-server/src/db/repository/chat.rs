//! Chat Repository
//!
//! 消息与未读计数内嵌在会话文档里：追加消息用 `+=`，
//! 未读/已读标记整体替换数组（单文档原子性足够）。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Chat, ChatMessage, UnreadEntry};
use chrono::{DateTime, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "chat";

#[derive(Clone)]
pub struct ChatRepository {
    base: BaseRepository,
}

impl ChatRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find chat by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Chat>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let chat: Option<Chat> = self.base.db().select(thing).await?;
        Ok(chat)
    }

    /// Find the chat between an unordered participant pair
    pub async fn find_by_participants(
        &self,
        a: &RecordId,
        b: &RecordId,
    ) -> RepoResult<Option<Chat>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM chat \
                 WHERE participants CONTAINS $a AND participants CONTAINS $b LIMIT 1",
            )
            .bind(("a", a.to_string()))
            .bind(("b", b.to_string()))
            .await?;
        let chats: Vec<Chat> = result.take(0)?;
        Ok(chats.into_iter().next())
    }

    /// Find the chat attached to an order
    pub async fn find_by_order(&self, order: &RecordId) -> RepoResult<Option<Chat>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM chat WHERE order = $order LIMIT 1")
            .bind(("order", order.to_string()))
            .await?;
        let chats: Vec<Chat> = result.take(0)?;
        Ok(chats.into_iter().next())
    }

    /// List every chat a user participates in, most recent activity first
    pub async fn find_by_participant(&self, user: &RecordId) -> RepoResult<Vec<Chat>> {
        let chats: Vec<Chat> = self
            .base
            .db()
            .query(
                "SELECT * FROM chat WHERE participants CONTAINS $user AND is_active = true \
                 ORDER BY last_message_at DESC",
            )
            .bind(("user", user.to_string()))
            .await?
            .take(0)?;
        Ok(chats)
    }

    /// Create a new chat
    pub async fn create(&self, chat: Chat) -> RepoResult<Chat> {
        let created: Option<Chat> = self.base.db().create(TABLE).content(chat).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create chat".to_string()))
    }

    /// Append a message, refresh denorm fields, replace unread counters
    pub async fn append_message(
        &self,
        id: &RecordId,
        message: ChatMessage,
        last_message_at: DateTime<Utc>,
        unread_counts: Vec<UnreadEntry>,
    ) -> RepoResult<Option<Chat>> {
        let last_message = message.content.clone();
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET messages += $message, last_message = $last_message, \
                 last_message_at = $last_message_at, unread_counts = $unread_counts \
                 RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("message", message))
            .bind(("last_message", last_message))
            .bind(("last_message_at", last_message_at))
            .bind(("unread_counts", unread_counts))
            .await?;
        let chats: Vec<Chat> = result.take(0)?;
        Ok(chats.into_iter().next())
    }

    /// Replace the message list and unread counters after a mark-read sweep
    pub async fn mark_read(
        &self,
        id: &RecordId,
        messages: Vec<ChatMessage>,
        unread_counts: Vec<UnreadEntry>,
    ) -> RepoResult<Option<Chat>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET messages = $messages, unread_counts = $unread_counts \
                 RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("messages", messages))
            .bind(("unread_counts", unread_counts))
            .await?;
        let chats: Vec<Chat> = result.take(0)?;
        Ok(chats.into_iter().next())
    }
}
