//! Application Services
//!
//! Business logic between the HTTP handlers and the repositories.

mod auth_service;
mod message_service;

pub use auth_service::{token_digest, AuthError, AuthService};
pub use message_service::MessageService;
