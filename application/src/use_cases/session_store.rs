//! Session state store
//!
//! Owns the canonical [`Session`] and hands a snapshot to the registered
//! [`SessionObserver`] after every change. The store never performs I/O;
//! the lock is only held for the synchronous domain call.

use crate::ports::session_observer::{NoObserver, SessionObserver};
use stack_domain::{Intent, Session, ValidationError};
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct SessionStore {
    session: Mutex<Session>,
    observer: Arc<dyn SessionObserver>,
    cancellation: CancellationToken,
}

impl SessionStore {
    pub fn new(observer: Arc<dyn SessionObserver>) -> Self {
        Self::with_session(Session::new(), observer)
    }

    pub fn with_session(session: Session, observer: Arc<dyn SessionObserver>) -> Self {
        Self {
            session: Mutex::new(session),
            observer,
            cancellation: CancellationToken::new(),
        }
    }

    /// Store without an observer
    pub fn detached() -> Self {
        Self::new(Arc::new(NoObserver))
    }

    /// Immutable copy of the current session
    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    /// Apply a primitive intent from the rendering layer.
    pub fn dispatch(&self, intent: Intent) -> Result<(), ValidationError> {
        debug!("Dispatching intent: {:?}", intent);
        self.mutate(|session| session.apply(intent))
    }

    /// Run `f` against the session, then publish a snapshot.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let (result, snapshot) = {
            let mut session = self.lock();
            let result = f(&mut session);
            (result, session.clone())
        };
        self.observer.on_snapshot(&snapshot);
        result
    }

    /// End the session: every in-flight call resolves as cancelled.
    pub fn discard(&self) {
        debug!("Discarding session");
        self.cancellation.cancel();
    }

    pub fn is_discarded(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
