//! The real-time message unit exchanged between client and server.

use serde::{Deserialize, Serialize};

use super::keys;
use super::topic::Topic;

/// One logical message per WebSocket frame, in both directions.
///
/// The `type` tag carries the kind; a frame with an absent or unrecognized
/// kind fails to decode and is dropped by the caller. A `to` field on a
/// broadcast frame is accepted and ignored. The push path forwards
/// envelopes as received; timestamps exist only on stored history records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope {
    /// Direct message to a single user.
    Dm {
        from: String,
        to: String,
        content: String,
    },
    /// Message to a named group; `to` holds the group name.
    Group {
        from: String,
        to: String,
        content: String,
    },
    /// Message to everyone.
    Broadcast { from: String, content: String },
}

impl Envelope {
    /// Kind label, matching the wire tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::Dm { .. } => "dm",
            Envelope::Group { .. } => "group",
            Envelope::Broadcast { .. } => "broadcast",
        }
    }

    /// Sender identity.
    pub fn sender(&self) -> &str {
        match self {
            Envelope::Dm { from, .. }
            | Envelope::Group { from, .. }
            | Envelope::Broadcast { from, .. } => from,
        }
    }

    /// Recipient identity (dm) or group name (group). None for broadcast.
    pub fn recipient(&self) -> Option<&str> {
        match self {
            Envelope::Dm { to, .. } | Envelope::Group { to, .. } => Some(to),
            Envelope::Broadcast { .. } => None,
        }
    }

    /// The bus topic this envelope publishes to.
    ///
    /// Kind and recipient jointly determine the topic: dm goes to the
    /// recipient's personal channel, group to the group's channel,
    /// broadcast to the global channel.
    pub fn topic(&self) -> Topic {
        match self {
            Envelope::Dm { to, .. } => Topic::User(to.clone()),
            Envelope::Group { to, .. } => Topic::Group(to.clone()),
            Envelope::Broadcast { .. } => Topic::Broadcast,
        }
    }

    /// The history key this envelope persists under.
    pub fn history_key(&self) -> String {
        match self {
            Envelope::Dm { from, to, .. } => keys::dm_history_key(from, to),
            Envelope::Group { to, .. } => keys::group_history_key(to),
            Envelope::Broadcast { .. } => keys::BROADCAST_HISTORY_KEY.to_string(),
        }
    }
}
