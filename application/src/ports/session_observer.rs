//! Snapshot observer port
//!
//! The rendering layer registers an observer to receive an immutable
//! snapshot of the session after every change.

use stack_domain::Session;

/// Callback for session snapshots
///
/// Called outside the session lock; implementations may block briefly
/// but must not call back into the store.
pub trait SessionObserver: Send + Sync {
    fn on_snapshot(&self, session: &Session);
}

/// No-op observer for when nothing renders the session
pub struct NoObserver;

impl SessionObserver for NoObserver {
    fn on_snapshot(&self, _session: &Session) {}
}
