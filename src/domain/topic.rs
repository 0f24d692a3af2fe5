//! Bus topic naming.
//!
//! Topics are opaque strings on the wire; this type keeps the three kinds
//! distinct until the moment a channel name is needed.

use std::fmt;

/// A channel on the pub/sub bus.
///
/// Topics have no lifecycle of their own: one exists as long as at least
/// one process holds a subscription to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Personal channel of a single user.
    User(String),
    /// Channel shared by a group's members.
    Group(String),
    /// The single process-wide broadcast channel.
    Broadcast,
}

impl Topic {
    /// The channel name published to and subscribed on the bus.
    pub fn channel(&self) -> String {
        match self {
            Topic::User(name) => format!("user:{}", name),
            Topic::Group(name) => format!("group:{}", name),
            Topic::Broadcast => "broadcast".to_string(),
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.channel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Topic::User("alice".into()), "user:alice"; "personal channel")]
    #[test_case(Topic::Group("rustaceans".into()), "group:rustaceans"; "group channel")]
    #[test_case(Topic::Broadcast, "broadcast"; "global channel")]
    fn channel_names(topic: Topic, expected: &str) {
        assert_eq!(topic.channel(), expected);
        assert_eq!(topic.to_string(), expected);
    }
}
