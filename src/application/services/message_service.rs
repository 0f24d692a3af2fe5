//! Message Service
//!
//! History reads and writes plus group CRUD for the request/response
//! path. The real-time path has its own persistence step in the inbound
//! dispatcher; both derive keys from `domain::keys` so they always
//! agree.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::keys::{dm_history_key, group_history_key, BROADCAST_HISTORY_KEY};
use crate::domain::{
    BroadcastMessage, DirectMessage, GroupMessage, GroupRepository, HistoryStore,
};
use crate::shared::error::AppError;

/// History and group operations behind the HTTP handlers.
pub struct MessageService<H, G>
where
    H: HistoryStore,
    G: GroupRepository,
{
    history: Arc<H>,
    groups: Arc<G>,
}

impl<H, G> MessageService<H, G>
where
    H: HistoryStore,
    G: GroupRepository,
{
    pub fn new(history: Arc<H>, groups: Arc<G>) -> Self {
        Self { history, groups }
    }

    /// Persist a direct message, stamping it now.
    pub async fn send_dm(
        &self,
        from: &str,
        to: &str,
        content: &str,
    ) -> Result<DirectMessage, AppError> {
        let message = DirectMessage {
            from: from.to_string(),
            to: to.to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
        };
        let entry = serde_json::to_string(&message)?;
        self.history.append(&dm_history_key(from, to), &entry).await?;
        Ok(message)
    }

    /// Full DM history between two users, oldest first.
    pub async fn dm_history(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Vec<DirectMessage>, AppError> {
        let entries = self.history.range(&dm_history_key(user_a, user_b)).await?;
        entries
            .iter()
            .map(|entry| serde_json::from_str(entry).map_err(AppError::from))
            .collect()
    }

    /// Create a group with its first member.
    pub async fn create_group(&self, group: &str, creator: &str) -> Result<(), AppError> {
        self.groups.create(group, creator).await
    }

    /// Add a member to a group.
    pub async fn join_group(&self, group: &str, member: &str) -> Result<(), AppError> {
        self.groups.join(group, member).await
    }

    /// Persist a group message, stamping it now.
    pub async fn send_group_message(
        &self,
        group: &str,
        from: &str,
        content: &str,
    ) -> Result<GroupMessage, AppError> {
        let message = GroupMessage {
            from: from.to_string(),
            group: group.to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
        };
        let entry = serde_json::to_string(&message)?;
        self.history.append(&group_history_key(group), &entry).await?;
        Ok(message)
    }

    /// Full group history; NotFound when the group does not exist.
    pub async fn group_history(&self, group: &str) -> Result<Vec<GroupMessage>, AppError> {
        if !self.groups.exists(group).await? {
            return Err(AppError::NotFound(format!("Group {} not found", group)));
        }
        let entries = self.history.range(&group_history_key(group)).await?;
        entries
            .iter()
            .map(|entry| serde_json::from_str(entry).map_err(AppError::from))
            .collect()
    }

    /// Current members of a group; NotFound when the group does not exist.
    pub async fn group_members(&self, group: &str) -> Result<Vec<String>, AppError> {
        if !self.groups.exists(group).await? {
            return Err(AppError::NotFound(format!("Group {} not found", group)));
        }
        self.groups.members_of(group).await
    }

    /// Persist a broadcast message, stamping it now.
    pub async fn send_broadcast(
        &self,
        from: &str,
        content: &str,
    ) -> Result<BroadcastMessage, AppError> {
        let message = BroadcastMessage {
            from: from.to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
        };
        let entry = serde_json::to_string(&message)?;
        self.history.append(BROADCAST_HISTORY_KEY, &entry).await?;
        Ok(message)
    }

    /// Full broadcast history, oldest first.
    pub async fn broadcast_history(&self) -> Result<Vec<BroadcastMessage>, AppError> {
        let entries = self.history.range(BROADCAST_HISTORY_KEY).await?;
        entries
            .iter()
            .map(|entry| serde_json::from_str(entry).map_err(AppError::from))
            .collect()
    }
}
