//! 会话与未读计数
//!
//! 同一对参与者只保留一个会话（无序对判定）。发消息后除发送者外
//! 每个参与者未读 +1；已读把本人计数清零，并为他人发出的未读消息
//! 补上已读时间戳。

use chrono::{DateTime, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use uuid::Uuid;

use crate::auth::Actor;
use crate::db::models::{Chat, ChatMessage, ChatOpen, ChatSendMessage, MessageType, UnreadEntry};
use crate::db::repository::{ChatRepository, OrderRepository, RestaurantRepository, UserRepository};
use crate::realtime::{Channel, Event, EventBus};
use crate::utils::{AppError, AppResult, parse_ref};

#[derive(Clone)]
pub struct ChatService {
    chats: ChatRepository,
    users: UserRepository,
    orders: OrderRepository,
    restaurants: RestaurantRepository,
    bus: EventBus,
}

impl ChatService {
    pub fn new(db: Surreal<Db>, bus: EventBus) -> Self {
        Self {
            chats: ChatRepository::new(db.clone()),
            users: UserRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            restaurants: RestaurantRepository::new(db),
            bus,
        }
    }

    /// 找到或建立与指定用户的会话
    pub async fn open(&self, actor: &Actor, payload: ChatOpen) -> AppResult<Chat> {
        let me = actor.user_id().clone();
        let other = parse_ref("user", &payload.participant_id)?;
        if other == me {
            return Err(AppError::validation("Cannot open a chat with yourself"));
        }
        self.users
            .find_by_id(&other.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if let Some(existing) = self.chats.find_by_participants(&me, &other).await? {
            return Ok(existing);
        }

        let restaurant = match payload.restaurant_id.as_deref() {
            Some(raw) => Some(parse_ref("restaurant", raw)?),
            None => None,
        };
        let order = match payload.order_id.as_deref() {
            Some(raw) => Some(parse_ref("order", raw)?),
            None => None,
        };

        self.create_chat(me, other, restaurant, order).await
    }

    /// 找到或建立某订单的会话（顾客 ↔ 店主）
    pub async fn open_for_order(&self, actor: &Actor, order_id: &str) -> AppResult<Chat> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))?;
        if !actor.is_order_participant(&order) {
            return Err(AppError::forbidden("Not a participant of this order"));
        }

        let order_ref = order
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Order record has no id"))?;
        if let Some(existing) = self.chats.find_by_order(&order_ref).await? {
            return Ok(existing);
        }

        let restaurant = self
            .restaurants
            .find_by_id(&order.restaurant.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("Restaurant not found"))?;

        self.create_chat(
            order.customer.clone(),
            restaurant.owner.clone(),
            Some(order.restaurant.clone()),
            Some(order_ref),
        )
        .await
    }

    /// 当前用户的会话列表，按最近活动排序
    pub async fn list(&self, actor: &Actor) -> AppResult<Vec<Chat>> {
        Ok(self.chats.find_by_participant(actor.user_id()).await?)
    }

    /// 所有会话的未读总数
    pub async fn unread_total(&self, actor: &Actor) -> AppResult<i64> {
        let me = actor.user_id();
        let chats = self.chats.find_by_participant(me).await?;
        Ok(chats.iter().map(|chat| chat.unread_for(me) as i64).sum())
    }

    /// 会话消息，仅参与者可读
    pub async fn messages(&self, actor: &Actor, chat_id: &str) -> AppResult<Vec<ChatMessage>> {
        let chat = self.fetch_joined(actor, chat_id).await?;
        Ok(chat.messages)
    }

    /// 发送消息
    pub async fn send_message(
        &self,
        actor: &Actor,
        chat_id: &str,
        payload: ChatSendMessage,
    ) -> AppResult<Chat> {
        let chat = self.fetch_joined(actor, chat_id).await?;
        let me = actor.user_id().clone();
        let id = chat_record_id(&chat)?;
        let now = Utc::now();

        let message = ChatMessage {
            message_id: Uuid::new_v4().to_string(),
            sender: me.clone(),
            content: payload.content,
            message_type: payload.message_type.unwrap_or(MessageType::Text),
            is_read: false,
            read_at: None,
            created_at: now,
        };
        let unread = bump_unread(&chat.unread_counts, &chat.participants, &me);

        let updated = self
            .chats
            .append_message(&id, message.clone(), now, unread)
            .await?
            .ok_or_else(|| AppError::not_found("Chat not found"))?;

        let payload = serde_json::json!({
            "chat_id": id.to_string(),
            "message": message,
        });
        for participant in chat.participants.iter().filter(|p| **p != me) {
            self.bus.publish(Event::new(
                &Channel::User(participant.key().to_string()),
                "new-message",
                payload.clone(),
            ));
        }

        Ok(updated)
    }

    /// 全量已读：清零本人未读，为他人消息补已读戳
    pub async fn mark_read(&self, actor: &Actor, chat_id: &str) -> AppResult<Chat> {
        let chat = self.fetch_joined(actor, chat_id).await?;
        let me = actor.user_id().clone();
        let id = chat_record_id(&chat)?;
        let now = Utc::now();

        let messages = sweep_read(chat.messages.clone(), &me, now);
        let unread = clear_unread(&chat.unread_counts, &me);

        let updated = self
            .chats
            .mark_read(&id, messages, unread)
            .await?
            .ok_or_else(|| AppError::not_found("Chat not found"))?;

        let payload = serde_json::json!({
            "chat_id": id.to_string(),
            "reader": me.to_string(),
        });
        for participant in chat.participants.iter().filter(|p| **p != me) {
            self.bus.publish(Event::new(
                &Channel::User(participant.key().to_string()),
                "message-read",
                payload.clone(),
            ));
        }

        Ok(updated)
    }

    // ========== Internal ==========

    async fn create_chat(
        &self,
        a: RecordId,
        b: RecordId,
        restaurant: Option<RecordId>,
        order: Option<RecordId>,
    ) -> AppResult<Chat> {
        let chat = Chat {
            id: None,
            participants: vec![a.clone(), b.clone()],
            restaurant,
            order,
            messages: vec![],
            last_message: None,
            last_message_at: None,
            unread_counts: vec![
                UnreadEntry { user: a, count: 0 },
                UnreadEntry { user: b, count: 0 },
            ],
            is_active: true,
            created_at: Utc::now(),
        };
        Ok(self.chats.create(chat).await?)
    }

    async fn fetch_joined(&self, actor: &Actor, chat_id: &str) -> AppResult<Chat> {
        let chat = self
            .chats
            .find_by_id(chat_id)
            .await?
            .ok_or_else(|| AppError::not_found("Chat not found"))?;
        if !actor.is_chat_participant(&chat) {
            return Err(AppError::forbidden("Not a participant of this chat"));
        }
        Ok(chat)
    }
}

fn chat_record_id(chat: &Chat) -> AppResult<RecordId> {
    chat.id
        .clone()
        .ok_or_else(|| AppError::internal("Chat record has no id"))
}

/// 除发送者外逐个 +1，缺失条目按 0 起算
fn bump_unread(
    counts: &[UnreadEntry],
    participants: &[RecordId],
    sender: &RecordId,
) -> Vec<UnreadEntry> {
    participants
        .iter()
        .map(|user| {
            let current = counts
                .iter()
                .find(|entry| entry.user == *user)
                .map(|entry| entry.count)
                .unwrap_or(0);
            let count = if user == sender { current } else { current + 1 };
            UnreadEntry {
                user: user.clone(),
                count,
            }
        })
        .collect()
}

/// 本人计数清零，他人保持不变
fn clear_unread(counts: &[UnreadEntry], reader: &RecordId) -> Vec<UnreadEntry> {
    counts
        .iter()
        .map(|entry| UnreadEntry {
            user: entry.user.clone(),
            count: if entry.user == *reader { 0 } else { entry.count },
        })
        .collect()
}

/// 他人发出的未读消息全部补戳
fn sweep_read(
    mut messages: Vec<ChatMessage>,
    reader: &RecordId,
    at: DateTime<Utc>,
) -> Vec<ChatMessage> {
    for message in messages.iter_mut() {
        if message.sender != *reader && !message.is_read {
            message.is_read = true;
            message.read_at = Some(at);
        }
    }
    messages
}
