//! Request DTOs
//!
//! Data structures for API request bodies.

use serde::Deserialize;
use validator::Validate;

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Send direct message request
#[derive(Debug, Deserialize, Validate)]
pub struct SendDmRequest {
    #[validate(length(min = 1, max = 32, message = "Recipient must be 1-32 characters"))]
    pub to: String,

    #[validate(length(min = 1, max = 4096, message = "Content must be 1-4096 characters"))]
    pub content: String,
}

/// Create group request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 2, max = 64, message = "Group name must be 2-64 characters"))]
    pub name: String,
}

/// Send group message request
#[derive(Debug, Deserialize, Validate)]
pub struct SendGroupMessageRequest {
    #[validate(length(min = 1, max = 4096, message = "Content must be 1-4096 characters"))]
    pub content: String,
}

/// Send broadcast request
#[derive(Debug, Deserialize, Validate)]
pub struct SendBroadcastRequest {
    #[validate(length(min = 1, max = 4096, message = "Content must be 1-4096 characters"))]
    pub content: String,
}
