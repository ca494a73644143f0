//! 账号服务
//!
//! 注册、身份查询与密码重置发起。重置令牌只存 sha-256 摘要，
//! 明文令牌只进邮件；邮件发送失败时先清掉已存摘要再上报错误，
//! 不留下可被撞的半成品令牌。

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::Actor;
use crate::db::models::{ForgotPasswordRequest, RegisterRequest, Restaurant, User};
use crate::db::repository::{RestaurantRepository, UserRepository};
use crate::services::EmailSender;
use crate::utils::{AppError, AppResult};

/// 重置令牌有效期（分钟）
const RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// `me` 响应，店主附带其餐厅
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<Restaurant>,
}

#[derive(Clone)]
pub struct AccountService {
    users: UserRepository,
    restaurants: RestaurantRepository,
    email: Arc<dyn EmailSender>,
}

impl AccountService {
    pub fn new(db: Surreal<Db>, email: Arc<dyn EmailSender>) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            restaurants: RestaurantRepository::new(db),
            email,
        }
    }

    /// 注册账号，邮箱全局唯一
    pub async fn register(&self, payload: RegisterRequest) -> AppResult<User> {
        let user = User {
            id: None,
            name: payload.name,
            email: payload.email.trim().to_lowercase(),
            role: payload.role,
            phone: payload.phone,
            avatar: None,
            is_active: true,
            reset_password_token: None,
            reset_password_expire: None,
            created_at: Utc::now(),
        };

        let created = self.users.create(user).await?;
        tracing::info!(email = %created.email, role = ?created.role, "Account registered");
        Ok(created)
    }

    /// 当前账号画像
    pub async fn me(&self, actor: &Actor) -> AppResult<Profile> {
        let user = self
            .users
            .find_by_id(&actor.user_id().to_string())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let restaurant = match actor.restaurant_id() {
            Some(id) => self.restaurants.find_by_id(&id.to_string()).await?,
            None => None,
        };

        Ok(Profile { user, restaurant })
    }

    /// 发起密码重置
    ///
    /// 1. 生成 20 字节随机令牌，库里只存 sha-256 摘要
    /// 2. 明文令牌随邮件送出
    /// 3. 邮件失败则清掉摘要与有效期，再把错误报给调用方
    pub async fn forgot_password(&self, payload: ForgotPasswordRequest) -> AppResult<()> {
        let user = self
            .users
            .find_by_email(payload.email.trim().to_lowercase().as_str())
            .await?
            .ok_or_else(|| AppError::not_found("No account with that email"))?;
        let id = user
            .id
            .clone()
            .ok_or_else(|| AppError::internal("User record has no id"))?;

        let token = generate_reset_token();
        let digest = hex::encode(Sha256::digest(token.as_bytes()));
        let expire = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        self.users.set_reset_token(&id, digest, expire).await?;

        let body = format!(
            "You requested a password reset. Your reset token is: {}\n\
             It expires in {} minutes. If you did not request this, ignore this email.",
            token, RESET_TOKEN_TTL_MINUTES
        );
        if let Err(err) = self
            .email
            .send_email(&user.email, "Password reset", &body)
            .await
        {
            // 邮件没送出去就不能留下摘要
            if let Err(clear_err) = self.users.clear_reset_token(&id).await {
                tracing::error!(error = %clear_err, user = %id, "Failed to clear reset token");
            }
            return Err(err);
        }

        tracing::info!(user = %id, "Password reset email sent");
        Ok(())
    }
}

/// 20 字节随机令牌，hex 编码
fn generate_reset_token() -> String {
    let mut bytes = [0u8; 20];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
    hex::encode(bytes)
}
