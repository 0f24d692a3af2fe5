//! Session Repository Implementation
//!
//! Redis implementation of server-side session storage. Sessions are
//! plain string values (the username) under the token digest, expiring
//! via Redis TTL.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::domain::SessionRepository;
use crate::shared::error::AppError;

fn session_key(token_digest: &str) -> String {
    format!("session:{}", token_digest)
}

/// Redis session repository.
pub struct RedisSessionRepository {
    conn: ConnectionManager,
}

impl RedisSessionRepository {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SessionRepository for RedisSessionRepository {
    async fn store(
        &self,
        token_digest: &str,
        username: &str,
        ttl_secs: u64,
    ) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(session_key(token_digest), username, ttl_secs)
            .await?;
        Ok(())
    }

    async fn lookup(&self, token_digest: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.conn.clone();
        let username: Option<String> = conn.get(session_key(token_digest)).await?;
        Ok(username)
    }

    async fn revoke(&self, token_digest: &str) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(session_key(token_digest)).await?;
        Ok(())
    }
}
