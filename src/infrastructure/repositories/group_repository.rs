//! Group Repository Implementation
//!
//! Redis implementation of group membership. Membership is kept as two
//! sets per edge: the group's member set and the user's group set, so
//! both directions are one SMEMBERS away.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::domain::keys::{group_members_key, user_groups_key};
use crate::domain::GroupRepository;
use crate::shared::error::AppError;

/// Redis group repository.
pub struct RedisGroupRepository {
    conn: ConnectionManager,
}

impl RedisGroupRepository {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    async fn add_member(&self, group: &str, member: &str) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let _: () = conn.sadd(group_members_key(group), member).await?;
        let _: () = conn.sadd(user_groups_key(member), group).await?;
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for RedisGroupRepository {
    async fn create(&self, group: &str, creator: &str) -> Result<(), AppError> {
        self.add_member(group, creator).await
    }

    async fn join(&self, group: &str, member: &str) -> Result<(), AppError> {
        self.add_member(group, member).await
    }

    async fn exists(&self, group: &str) -> Result<bool, AppError> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(group_members_key(group)).await?;
        Ok(exists)
    }

    async fn members_of(&self, group: &str) -> Result<Vec<String>, AppError> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = conn.smembers(group_members_key(group)).await?;
        Ok(members)
    }

    async fn groups_of(&self, username: &str) -> Result<Vec<String>, AppError> {
        let mut conn = self.conn.clone();
        let groups: Vec<String> = conn.smembers(user_groups_key(username)).await?;
        Ok(groups)
    }
}
