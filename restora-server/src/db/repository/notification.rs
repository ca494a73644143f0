//! Notification Repository

use super::{BaseRepository, Pagination, RepoError, RepoResult};
use crate::db::models::Notification;
use chrono::{DateTime, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "notification";

#[derive(Clone)]
pub struct NotificationRepository {
    base: BaseRepository,
}

impl NotificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find notification by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Notification>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let notification: Option<Notification> = self.base.db().select(thing).await?;
        Ok(notification)
    }

    /// Create a new notification
    pub async fn create(&self, notification: Notification) -> RepoResult<Notification> {
        let created: Option<Notification> =
            self.base.db().create(TABLE).content(notification).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create notification".to_string()))
    }

    /// List a user's notifications, newest first
    pub async fn find_by_recipient(
        &self,
        recipient: &RecordId,
        page: Pagination,
    ) -> RepoResult<Vec<Notification>> {
        let notifications: Vec<Notification> = self
            .base
            .db()
            .query(
                "SELECT * FROM notification WHERE recipient = $recipient \
                 ORDER BY created_at DESC LIMIT $limit START $start",
            )
            .bind(("recipient", recipient.to_string()))
            .bind(("limit", page.limit))
            .bind(("start", page.start()))
            .await?
            .take(0)?;
        Ok(notifications)
    }

    /// Count a user's notifications
    pub async fn count_by_recipient(&self, recipient: &RecordId) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM notification WHERE recipient = $recipient GROUP ALL")
            .bind(("recipient", recipient.to_string()))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Count a user's unread notifications
    pub async fn count_unread(&self, recipient: &RecordId) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() FROM notification \
                 WHERE recipient = $recipient AND is_read = false GROUP ALL",
            )
            .bind(("recipient", recipient.to_string()))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Mark one notification read
    pub async fn mark_read(&self, id: &RecordId, at: DateTime<Utc>) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET is_read = true, read_at = $at")
            .bind(("thing", id.clone()))
            .bind(("at", at))
            .await?;
        Ok(())
    }

    /// Mark every unread notification of a user read
    pub async fn mark_all_read(&self, recipient: &RecordId, at: DateTime<Utc>) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "UPDATE notification SET is_read = true, read_at = $at \
                 WHERE recipient = $recipient AND is_read = false",
            )
            .bind(("at", at))
            .bind(("recipient", recipient.to_string()))
            .await?;
        Ok(())
    }

    /// Hard delete a notification
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", id.clone()))
            .await?;
        Ok(true)
    }
}
