//! Stored message records.
//!
//! These are the shapes persisted to (and read back from) the history
//! store. Unlike the wire envelope they carry a timestamp, stamped
//! server-side at the moment of persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted direct message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub from: String,
    pub to: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A persisted group message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMessage {
    pub from: String,
    pub group: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A persisted broadcast message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastMessage {
    pub from: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_roundtrip_with_rfc3339_timestamps() {
        let msg = DirectMessage {
            from: "alice".into(),
            to: "bob".into(),
            content: "hi".into(),
            timestamp: "2026-08-06T12:00:00Z".parse().unwrap(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("2026-08-06T12:00:00Z"));
        let back: DirectMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
