//! Session and handle identity state
//!
//! Mutated only by the command dispatcher, and only on success responses;
//! read concurrently by the poll loop. One lock guards both identifiers so
//! a reader can never observe a half-applied update.

use parking_lot::RwLock;

/// Opaque session identifier allocated by the gateway
pub type SessionId = u64;

/// Opaque plugin handle identifier allocated by the gateway
pub type HandleId = u64;

/// Current session/handle identity of one client instance
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    inner: RwLock<Ids>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Ids {
    session: Option<SessionId>,
    handle: Option<HandleId>,
}

impl SessionState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether a session is live
    pub(crate) fn has_session(&self) -> bool {
        self.inner.read().session.is_some()
    }

    /// Whether a plugin handle is attached
    pub(crate) fn has_handle(&self) -> bool {
        self.inner.read().handle.is_some()
    }

    /// Current session identifier, if any
    pub(crate) fn session_id(&self) -> Option<SessionId> {
        self.inner.read().session
    }

    /// Current handle identifier, if any
    pub(crate) fn handle_id(&self) -> Option<HandleId> {
        self.inner.read().handle
    }

    /// Record the session id from a successful create exchange
    pub(crate) fn set_session(&self, id: SessionId) {
        self.inner.write().session = Some(id);
    }

    /// Record the handle id from a successful attach exchange
    pub(crate) fn set_handle(&self, id: HandleId) {
        self.inner.write().handle = Some(id);
    }

    /// Clear the session; a handle cannot outlive its session, so the
    /// handle is cleared in the same critical section
    pub(crate) fn clear_session(&self) {
        let mut ids = self.inner.write();
        ids.session = None;
        ids.handle = None;
    }

    /// Clear the handle only
    pub(crate) fn clear_handle(&self) {
        self.inner.write().handle = None;
    }

    /// Session-scoped path segment, derived live from the current id
    pub(crate) fn session_path(&self) -> Option<String> {
        self.inner.read().session.map(|id| id.to_string())
    }

    /// Handle-scoped path segments, taken from one atomic snapshot
    pub(crate) fn handle_path(&self) -> Option<String> {
        let ids = *self.inner.read();
        match (ids.session, ids.handle) {
            (Some(session), Some(handle)) => Some(format!("{}/{}", session, handle)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let state = SessionState::new();
        assert!(!state.has_session());
        assert!(!state.has_handle());
        assert_eq!(state.session_path(), None);
        assert_eq!(state.handle_path(), None);
    }

    #[test]
    fn test_validity_follows_set_order() {
        let state = SessionState::new();
        state.set_session(12345);
        assert!(state.has_session());
        assert!(!state.has_handle());

        state.set_handle(987);
        assert!(state.has_handle());
        assert_eq!(state.session_id(), Some(12345));
        assert_eq!(state.handle_id(), Some(987));
    }

    #[test]
    fn test_paths_are_derived_from_current_ids() {
        let state = SessionState::new();
        state.set_session(12345);
        assert_eq!(state.session_path().as_deref(), Some("12345"));
        assert_eq!(state.handle_path(), None);

        state.set_handle(987);
        assert_eq!(state.handle_path().as_deref(), Some("12345/987"));

        state.set_session(777);
        assert_eq!(state.session_path().as_deref(), Some("777"));
        assert_eq!(state.handle_path().as_deref(), Some("777/987"));
    }

    #[test]
    fn test_clear_session_cascades_to_handle() {
        let state = SessionState::new();
        state.set_session(12345);
        state.set_handle(987);

        state.clear_session();
        assert!(!state.has_session());
        assert!(!state.has_handle());
        assert_eq!(state.handle_path(), None);
    }

    #[test]
    fn test_clear_handle_keeps_session() {
        let state = SessionState::new();
        state.set_session(12345);
        state.set_handle(987);

        state.clear_handle();
        assert!(state.has_session());
        assert!(!state.has_handle());
        assert_eq!(state.session_path().as_deref(), Some("12345"));
    }
}
