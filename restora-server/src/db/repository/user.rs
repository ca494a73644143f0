//! User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::User;
use chrono::{DateTime, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    pub async fn create(&self, user: User) -> RepoResult<User> {
        // Check duplicate email
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' is already registered",
                user.email
            )));
        }

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Store the reset-token digest and its expiry
    ///
    /// skip_serializing 字段不会随 content() 写入，只能走显式 UPDATE。
    pub async fn set_reset_token(
        &self,
        id: &RecordId,
        digest: String,
        expire: DateTime<Utc>,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET reset_password_token = $digest, reset_password_expire = $expire")
            .bind(("thing", id.clone()))
            .bind(("digest", digest))
            .bind(("expire", expire))
            .await?;
        Ok(())
    }

    /// Clear any stored reset-token digest
    pub async fn clear_reset_token(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET reset_password_token = NONE, reset_password_expire = NONE")
            .bind(("thing", id.clone()))
            .await?;
        Ok(())
    }
}
