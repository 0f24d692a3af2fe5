//! User Repository Implementation
//!
//! Redis implementation of user account storage: a hash per user plus a
//! global set of usernames.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::domain::{User, UserRepository};
use crate::shared::error::AppError;

/// Set of all registered usernames.
const USERS_SET_KEY: &str = "users";

fn user_key(username: &str) -> String {
    format!("user:{}", username)
}

/// Redis user repository.
pub struct RedisUserRepository {
    conn: ConnectionManager,
}

impl RedisUserRepository {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl UserRepository for RedisUserRepository {
    async fn exists(&self, username: &str) -> Result<bool, AppError> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(user_key(username)).await?;
        Ok(exists)
    }

    async fn create(&self, user: &User) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .hset(user_key(&user.username), "password", &user.password_hash)
            .await?;
        let _: () = conn.sadd(USERS_SET_KEY, &user.username).await?;
        Ok(())
    }

    async fn find(&self, username: &str) -> Result<Option<User>, AppError> {
        let mut conn = self.conn.clone();
        let hash: Option<String> = conn.hget(user_key(username), "password").await?;
        Ok(hash.map(|password_hash| User {
            username: username.to_string(),
            password_hash,
        }))
    }
}
