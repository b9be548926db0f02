//! Session Marker
//!
//! In-process view of the client's signed session reference. Use cases
//! read and update it; the presentation layer turns the final state into
//! a `Set-Cookie` header.

use crate::domain::value_object::session_id::SessionId;

/// What must happen to the client-side marker once the request completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerChange {
    #[default]
    Unchanged,
    /// Point the client at a newly issued session
    Issued(SessionId),
    /// Remove the marker from the client
    Cleared,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMarker {
    session_id: Option<SessionId>,
    change: MarkerChange,
    /// A cookie arrived but failed verification
    rejected: bool,
}

impl SessionMarker {
    /// Marker as received with the request
    pub fn incoming(session_id: Option<SessionId>) -> Self {
        Self {
            session_id,
            change: MarkerChange::Unchanged,
            rejected: false,
        }
    }

    /// Marker for a cookie that was present but malformed or forged
    pub fn rejected() -> Self {
        Self {
            session_id: None,
            change: MarkerChange::Unchanged,
            rejected: true,
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    pub fn change(&self) -> MarkerChange {
        self.change
    }

    pub fn issue(&mut self, session_id: SessionId) {
        self.session_id = Some(session_id);
        self.change = MarkerChange::Issued(session_id);
    }

    pub fn clear(&mut self) {
        self.session_id = None;
        self.change = MarkerChange::Cleared;
        self.rejected = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_transitions() {
        let first = SessionId::generate();
        let mut marker = SessionMarker::incoming(Some(first));
        assert_eq!(marker.change(), MarkerChange::Unchanged);

        let second = SessionId::generate();
        marker.issue(second);
        assert_eq!(marker.session_id(), Some(second));
        assert_eq!(marker.change(), MarkerChange::Issued(second));

        marker.clear();
        assert_eq!(marker.session_id(), None);
        assert_eq!(marker.change(), MarkerChange::Cleared);
    }

    #[test]
    fn test_rejected_marker() {
        let mut marker = SessionMarker::rejected();
        assert!(marker.is_rejected());
        assert_eq!(marker.session_id(), None);
        assert_eq!(marker.change(), MarkerChange::Unchanged);

        marker.clear();
        assert!(!marker.is_rejected());
        assert_eq!(marker.change(), MarkerChange::Cleared);
    }
}
