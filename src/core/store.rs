use crate::core::models::TrackingState;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// Monotonically increasing identifier of a polling session.
pub type SessionId = u64;

#[derive(Default)]
struct Sessions {
    last_issued: SessionId,
    active: Option<SessionId>,
}

struct StoreInner {
    state: watch::Sender<TrackingState>,
    // Held across every session-gated write so a check-then-write cannot
    // interleave with a session being started or cancelled.
    sessions: Mutex<Sessions>,
}

/// Owned container for the single [`TrackingState`].
///
/// Readers use [`TrackingStore::get`] and [`TrackingStore::subscribe`]. Writes
/// from a polling session only land while that session is the active one.
#[derive(Clone)]
pub struct TrackingStore {
    inner: Arc<StoreInner>,
}

impl TrackingStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(TrackingState::default());
        Self {
            inner: Arc::new(StoreInner {
                state,
                sessions: Mutex::new(Sessions::default()),
            }),
        }
    }

    pub fn get(&self) -> TrackingState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TrackingState> {
        self.inner.state.subscribe()
    }

    /// Registers a new session, invalidating whichever one was active, and
    /// puts the state into loading for `flight_number`.
    pub(crate) fn begin_session(&self, flight_number: &str) -> SessionId {
        let mut sessions = self.sessions();
        sessions.last_issued += 1;
        let id = sessions.last_issued;
        sessions.active = Some(id);

        self.inner.state.send_modify(|state| {
            state.is_loading = true;
            state.flight_number = Some(flight_number.to_string());
        });
        id
    }

    /// Deactivates `id` if it is still the active session. Returns whether it was.
    pub(crate) fn end_session(&self, id: SessionId) -> bool {
        let mut sessions = self.sessions();
        if sessions.active != Some(id) {
            return false;
        }
        sessions.active = None;

        self.inner.state.send_if_modified(|state| {
            let was_loading = state.is_loading;
            state.is_loading = false;
            was_loading
        });
        true
    }

    /// Applies `update` only if `id` is still the active session.
    pub(crate) fn update_session<F>(&self, id: SessionId, update: F) -> bool
    where
        F: FnOnce(&mut TrackingState),
    {
        let sessions = self.sessions();
        if sessions.active != Some(id) {
            return false;
        }
        self.inner.state.send_modify(update);
        true
    }

    /// Applies `update` regardless of session; used for input validation.
    pub(crate) fn update<F>(&self, update: F)
    where
        F: FnOnce(&mut TrackingState),
    {
        let _sessions = self.sessions();
        self.inner.state.send_modify(update);
    }

    fn sessions(&self) -> MutexGuard<'_, Sessions> {
        self.inner
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for TrackingStore {
    fn default() -> Self {
        Self::new()
    }
}
