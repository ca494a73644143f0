//! 站内通知
//!
//! 通知同步落库，随后在 `user-{id}` 频道广播并尝试推送。
//! 广播与推送失败只记日志，不参与调用方的成败。

use std::sync::Arc;

use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use crate::auth::Actor;
use crate::db::models::{Notification, NotificationKind};
use crate::db::repository::{NotificationRepository, Pagination};
use crate::realtime::{Channel, Event, EventBus};
use crate::services::PushSender;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct NotificationService {
    notifications: NotificationRepository,
    bus: EventBus,
    push: Arc<dyn PushSender>,
}

impl NotificationService {
    pub fn new(db: Surreal<Db>, bus: EventBus, push: Arc<dyn PushSender>) -> Self {
        Self {
            notifications: NotificationRepository::new(db),
            bus,
            push,
        }
    }

    /// 创建通知并广播
    pub async fn notify(
        &self,
        recipient: &RecordId,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
        related_order: Option<RecordId>,
        related_reservation: Option<RecordId>,
    ) -> AppResult<Notification> {
        let notification = Notification {
            id: None,
            recipient: recipient.clone(),
            title: title.into(),
            message: message.into(),
            kind,
            related_order,
            related_reservation,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        };
        let stored = self.notifications.create(notification).await?;

        let channel = Channel::User(recipient.key().to_string());
        match serde_json::to_value(&stored) {
            Ok(payload) => self.bus.publish(Event::new(&channel, "notification", payload)),
            Err(err) => tracing::warn!(error = %err, "Failed to encode notification event"),
        }
        if let Err(err) = self
            .push
            .send_push(recipient, &stored.title, &stored.message)
            .await
        {
            tracing::warn!(error = %err, recipient = %recipient, "Push delivery failed");
        }

        Ok(stored)
    }

    /// 当前用户的通知（新到旧）
    pub async fn list(
        &self,
        actor: &Actor,
        page: Pagination,
    ) -> AppResult<(Vec<Notification>, i64)> {
        let recipient = actor.user_id();
        let items = self.notifications.find_by_recipient(recipient, page).await?;
        let total = self.notifications.count_by_recipient(recipient).await?;
        Ok((items, total))
    }

    pub async fn unread_count(&self, actor: &Actor) -> AppResult<i64> {
        Ok(self.notifications.count_unread(actor.user_id()).await?)
    }

    /// 标记单条已读
    pub async fn mark_read(&self, actor: &Actor, id: &str) -> AppResult<Notification> {
        let notification = self.fetch_owned(actor, id).await?;
        let thing = record_id(&notification)?;
        self.notifications.mark_read(&thing, Utc::now()).await?;

        self.notifications
            .find_by_id(&thing.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))
    }

    /// 全部已读
    pub async fn mark_all_read(&self, actor: &Actor) -> AppResult<()> {
        self.notifications
            .mark_all_read(actor.user_id(), Utc::now())
            .await?;
        Ok(())
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> AppResult<()> {
        let notification = self.fetch_owned(actor, id).await?;
        let thing = record_id(&notification)?;
        self.notifications.delete(&thing).await?;
        Ok(())
    }

    /// 取出通知并校验接收者
    async fn fetch_owned(&self, actor: &Actor, id: &str) -> AppResult<Notification> {
        let notification = self
            .notifications
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))?;
        if !actor.is_recipient(&notification) {
            return Err(AppError::forbidden("Not your notification"));
        }
        Ok(notification)
    }
}

fn record_id(notification: &Notification) -> AppResult<RecordId> {
    notification
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Notification record has no id"))
}
