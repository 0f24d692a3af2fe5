//! User entity.

use serde::{Deserialize, Serialize};

/// A registered user.
///
/// The username is the identity everywhere in the system: registry keys,
/// personal bus topics, and history keys all derive from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    /// Argon2id hash, never the plaintext password.
    #[serde(skip_serializing)]
    pub password_hash: String,
}
