//! Repository traits.
//!
//! Data-access contracts implemented by the infrastructure layer. The
//! real-time core only ever sees `HistoryStore` and `GroupRepository`;
//! the rest serve the HTTP CRUD surface.

use async_trait::async_trait;

use super::entities::User;
use crate::shared::error::AppError;

/// User account storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn exists(&self, username: &str) -> Result<bool, AppError>;
    async fn create(&self, user: &User) -> Result<(), AppError>;
    /// The stored user, or None for an unknown username.
    async fn find(&self, username: &str) -> Result<Option<User>, AppError>;
}

/// Server-side session token storage.
///
/// Tokens are stored under a digest of the token, never the raw value.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn store(&self, token_digest: &str, username: &str, ttl_secs: u64)
        -> Result<(), AppError>;
    /// Resolve a token digest to its username, if the session is live.
    async fn lookup(&self, token_digest: &str) -> Result<Option<String>, AppError>;
    async fn revoke(&self, token_digest: &str) -> Result<(), AppError>;
}

/// Group membership storage.
///
/// Membership is written by the CRUD path (create/join) and read by the
/// subscription manager at connection time. There is no notification of
/// later changes; consumers see membership as of when they asked.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Create a group with its first member. Creating an existing group
    /// just adds the member.
    async fn create(&self, group: &str, creator: &str) -> Result<(), AppError>;
    async fn join(&self, group: &str, member: &str) -> Result<(), AppError>;
    async fn exists(&self, group: &str) -> Result<bool, AppError>;
    async fn members_of(&self, group: &str) -> Result<Vec<String>, AppError>;
    /// Every group the user currently belongs to.
    async fn groups_of(&self, username: &str) -> Result<Vec<String>, AppError>;
}

/// Durable append-only history log.
///
/// Keys are derived by the caller (see `domain::keys`); entries are
/// opaque serialized records. Consulted only by the request/response
/// path; the real-time path appends and never reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, key: &str, entry: &str) -> Result<(), AppError>;
    /// The full log under a key, oldest first. No pagination.
    async fn range(&self, key: &str) -> Result<Vec<String>, AppError>;
}
