//! Authentication Service
//!
//! User registration, credential checks, and server-side session tokens.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::{SessionRepository, User, UserRepository};

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameExists,

    #[error("Session not found or expired")]
    SessionNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Authentication service.
///
/// Tokens are opaque UUIDs handed to the client; the store only ever
/// sees their SHA-256 digest, keyed with the session TTL.
pub struct AuthService<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    session_ttl_secs: u64,
}

impl<U, S> AuthService<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, session_ttl_secs: u64) -> Self {
        Self {
            user_repo,
            session_repo,
            session_ttl_secs,
        }
    }

    /// Register a new user.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let exists = self
            .user_repo
            .exists(username)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if exists {
            return Err(AuthError::UsernameExists);
        }

        let user = User {
            username: username.to_string(),
            password_hash: hash_password(password)?,
        };
        self.user_repo
            .create(&user)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Authenticate and mint a session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .user_repo
            .find(username)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = Uuid::new_v4().to_string();
        self.session_repo
            .store(&token_digest(&token), username, self.session_ttl_secs)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(token)
    }

    /// Resolve a presented token to its username.
    pub async fn validate(&self, token: &str) -> Result<String, AuthError> {
        self.session_repo
            .lookup(&token_digest(token))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::SessionNotFound)
    }

    /// Revoke a token (logout). Revoking an unknown token is a no-op.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.session_repo
            .revoke(&token_digest(token))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}

/// Hash a password using Argon2id
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its hash
fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Storage key digest of a session token.
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
