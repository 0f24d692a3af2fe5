//! History Store Implementation
//!
//! Redis implementation of the append-only history log: one list per
//! conversation key, RPUSH to append, LRANGE 0 -1 to read it back.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::domain::HistoryStore;
use crate::shared::error::AppError;

/// Redis history store.
pub struct RedisHistoryStore {
    conn: ConnectionManager,
}

impl RedisHistoryStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl HistoryStore for RedisHistoryStore {
    async fn append(&self, key: &str, entry: &str) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let _: () = conn.rpush(key, entry).await?;
        Ok(())
    }

    async fn range(&self, key: &str) -> Result<Vec<String>, AppError> {
        let mut conn = self.conn.clone();
        let entries: Vec<String> = conn.lrange(key, 0, -1).await?;
        Ok(entries)
    }
}
