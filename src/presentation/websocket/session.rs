//! WebSocket Session State
//!
//! The per-connection worker's lifecycle, kept as an explicit state
//! machine rather than inferred from control flow, so each transition
//! can be tested in isolation.

use uuid::Uuid;

/// States of the connection read loop.
///
/// `Upgraded → Registered → (Reading ⇄ Dispatching) → Closed`; any
/// non-closed state may transition to `Closed`, and `Closed` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Protocol handshake succeeded.
    Upgraded,
    /// Identity recorded in the registry, subscriptions established.
    Registered,
    /// Blocked on the next frame.
    Reading,
    /// Handing a decoded frame to the inbound dispatcher.
    Dispatching,
    /// Read error or close; the only path out of the loop.
    Closed,
}

impl ConnectionState {
    /// Whether `next` is a legal successor of this state.
    pub fn can_advance_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Upgraded, Registered)
                | (Registered, Reading)
                | (Reading, Dispatching)
                | (Dispatching, Reading)
                | (Upgraded, Closed)
                | (Registered, Closed)
                | (Reading, Closed)
                | (Dispatching, Closed)
        )
    }
}

/// Illegal state transition.
#[derive(Debug, thiserror::Error)]
#[error("invalid connection state transition: {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: ConnectionState,
    pub to: ConnectionState,
}

/// Per-connection session state.
#[derive(Debug)]
pub struct SessionState {
    pub user: String,
    pub connection_id: Uuid,
    state: ConnectionState,
}

impl SessionState {
    /// A freshly upgraded session.
    pub fn new(user: String) -> Self {
        Self {
            user,
            connection_id: Uuid::new_v4(),
            state: ConnectionState::Upgraded,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Move to the next state, rejecting illegal transitions.
    pub fn advance(&mut self, next: ConnectionState) -> Result<(), InvalidTransition> {
        if !self.state.can_advance_to(next) {
            return Err(InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectionState::*;
    use super::*;
    use test_case::test_case;

    #[test_case(Upgraded, Registered, true)]
    #[test_case(Registered, Reading, true)]
    #[test_case(Reading, Dispatching, true)]
    #[test_case(Dispatching, Reading, true)]
    #[test_case(Upgraded, Closed, true)]
    #[test_case(Registered, Closed, true)]
    #[test_case(Reading, Closed, true)]
    #[test_case(Dispatching, Closed, true)]
    #[test_case(Upgraded, Reading, false; "cannot read before registering")]
    #[test_case(Registered, Dispatching, false; "cannot dispatch without a frame")]
    #[test_case(Reading, Registered, false; "no going back")]
    #[test_case(Closed, Reading, false; "closed is final")]
    #[test_case(Closed, Closed, false; "closed does not repeat")]
    fn transition_matrix(from: ConnectionState, to: ConnectionState, legal: bool) {
        assert_eq!(from.can_advance_to(to), legal);
    }

    #[test]
    fn advance_walks_the_happy_path() {
        let mut session = SessionState::new("alice".into());
        assert_eq!(session.state(), Upgraded);

        session.advance(Registered).unwrap();
        session.advance(Reading).unwrap();
        session.advance(Dispatching).unwrap();
        session.advance(Reading).unwrap();
        session.advance(Closed).unwrap();
        assert_eq!(session.state(), Closed);
    }

    #[test]
    fn advance_rejects_illegal_transitions() {
        let mut session = SessionState::new("alice".into());
        let err = session.advance(Dispatching).unwrap_err();
        assert_eq!(err.from, Upgraded);
        assert_eq!(err.to, Dispatching);
        // State unchanged after a rejected transition.
        assert_eq!(session.state(), Upgraded);
    }

    #[test]
    fn each_session_gets_its_own_connection_id() {
        let a = SessionState::new("alice".into());
        let b = SessionState::new("alice".into());
        assert_ne!(a.connection_id, b.connection_id);
    }
}
