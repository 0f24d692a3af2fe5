//! Response DTOs
//!
//! Data structures for API response bodies. History endpoints return the
//! stored records directly; these cover the rest.

use serde::Serialize;

/// Generic status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
}

impl StatusResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Login response carrying the session token
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub message: &'static str,
    pub token: String,
}

impl TokenResponse {
    pub fn new(token: String) -> Self {
        Self {
            message: "Login successful",
            token,
        }
    }
}
