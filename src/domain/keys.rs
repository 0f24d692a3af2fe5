//! Storage key derivation for conversation history.
//!
//! Both the HTTP history path and the real-time persistence path derive
//! keys through these functions so the two always agree.

/// Key of the broadcast history log.
pub const BROADCAST_HISTORY_KEY: &str = "broadcast:messages";

/// History key for a direct-message conversation.
///
/// The two identities are ordered lexicographically so that both
/// directions of a conversation resolve to the same key.
pub fn dm_history_key(user_a: &str, user_b: &str) -> String {
    if user_a <= user_b {
        format!("dm:{}:{}", user_a, user_b)
    } else {
        format!("dm:{}:{}", user_b, user_a)
    }
}

/// History key for a group's message log.
pub fn group_history_key(group: &str) -> String {
    format!("group:{}:messages", group)
}

/// Key of the membership set for a group.
pub fn group_members_key(group: &str) -> String {
    format!("group:{}:members", group)
}

/// Key of the set of groups a user belongs to.
pub fn user_groups_key(user: &str) -> String {
    format!("user:{}:groups", user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("alice", "bob", "dm:alice:bob"; "already ordered")]
    #[test_case("bob", "alice", "dm:alice:bob"; "reversed")]
    #[test_case("carol", "carol", "dm:carol:carol"; "self conversation")]
    fn dm_keys_are_canonical(a: &str, b: &str, expected: &str) {
        assert_eq!(dm_history_key(a, b), expected);
    }

    #[test]
    fn group_keys() {
        assert_eq!(group_history_key("rustaceans"), "group:rustaceans:messages");
        assert_eq!(group_members_key("rustaceans"), "group:rustaceans:members");
        assert_eq!(user_groups_key("alice"), "user:alice:groups");
    }
}
