//! 外协通知通道
//!
//! 邮件与推送以进程内 trait 对象接入。发送失败只记日志、不打断
//! 业务写入，唯一例外是密码重置邮件（见 [`super::accounts`]）。

use std::fmt;

use async_trait::async_trait;
use surrealdb::RecordId;

use crate::utils::{AppError, AppResult};

/// Outbound email channel
#[async_trait]
pub trait EmailSender: Send + Sync + fmt::Debug {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}

/// Outbound push channel
#[async_trait]
pub trait PushSender: Send + Sync + fmt::Debug {
    async fn send_push(&self, user: &RecordId, title: &str, body: &str) -> AppResult<()>;
}

/// 开发与测试用实现：把出站消息落到结构化日志
#[derive(Debug, Clone, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send_email(&self, to: &str, subject: &str, _body: &str) -> AppResult<()> {
        tracing::info!(to, subject, "Email dispatched");
        Ok(())
    }
}

/// 邮件通道关停时的实现，所有发送都报上游失败
#[derive(Debug, Clone, Default)]
pub struct DisabledEmailSender;

#[async_trait]
impl EmailSender for DisabledEmailSender {
    async fn send_email(&self, _to: &str, _subject: &str, _body: &str) -> AppResult<()> {
        Err(AppError::upstream("Email delivery is disabled"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogPushSender;

#[async_trait]
impl PushSender for LogPushSender {
    async fn send_push(&self, user: &RecordId, title: &str, _body: &str) -> AppResult<()> {
        tracing::info!(user = %user, title, "Push dispatched");
        Ok(())
    }
}
