use crate::core::models::{FlightSnapshot, TrackingState};
use crate::core::store::{SessionId, TrackingStore};
use crate::tracking::repository::TrackingRepository;
use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

pub const POLL_INTERVAL: Duration = Duration::from_secs(60);
pub const INVALID_FLIGHT_MESSAGE: &str = "Please enter a valid flight number";

/// Handle to the one running polling loop.
struct TrackingSession {
    id: SessionId,
    flight_number: String,
    token: CancellationToken,
}

impl TrackingSession {
    fn cancel(&self, store: &TrackingStore) {
        self.token.cancel();
        store.end_session(self.id);
    }
}

/// Drives a single self-rescheduling fetch loop and publishes its state.
///
/// At most one session is active: [`TrackingController::track`] cancels the
/// previous session before starting the next, and the store rejects writes
/// from any session that is no longer active. Dropping the controller stops
/// the loop.
pub struct TrackingController {
    repository: TrackingRepository,
    store: TrackingStore,
    poll_interval: Duration,
    session: Mutex<Option<TrackingSession>>,
}

impl TrackingController {
    pub fn new(repository: TrackingRepository, poll_interval: Duration) -> Self {
        Self {
            repository,
            store: TrackingStore::new(),
            poll_interval,
            session: Mutex::new(None),
        }
    }

    pub fn state(&self) -> TrackingState {
        self.store.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<TrackingState> {
        self.store.subscribe()
    }

    pub fn is_tracking(&self) -> bool {
        self.lock_session().is_some()
    }

    pub fn tracked_flight(&self) -> Option<String> {
        self.lock_session()
            .as_ref()
            .map(|session| session.flight_number.clone())
    }

    /// Starts polling `flight_number`, superseding any running session.
    ///
    /// Blank input only records a validation error; a running session is left
    /// alone. Must be called from within a Tokio runtime.
    pub fn track(&self, flight_number: &str) {
        let flight_number = flight_number.trim();
        if flight_number.is_empty() {
            tracing::debug!("Rejected blank flight number");
            self.store.update(|state| {
                state.is_loading = false;
                state.last_error = Some(INVALID_FLIGHT_MESSAGE.to_string());
            });
            return;
        }

        let mut current = self.lock_session();
        if let Some(previous) = current.take() {
            tracing::info!(
                flight = %previous.flight_number,
                session = previous.id,
                "Superseding tracking session"
            );
            previous.cancel(&self.store);
        }

        let id = self.store.begin_session(flight_number);
        let token = CancellationToken::new();

        let poll_loop = PollLoop {
            id,
            flight_number: flight_number.to_string(),
            repository: self.repository.clone(),
            store: self.store.clone(),
            interval: self.poll_interval,
        };
        tokio::spawn(poll_loop.run(token.clone()));

        tracing::info!(
            flight = %flight_number,
            session = id,
            interval_secs = self.poll_interval.as_secs(),
            "Started tracking"
        );

        *current = Some(TrackingSession {
            id,
            flight_number: flight_number.to_string(),
            token,
        });
    }

    /// Cancels the active session, if any. Last results and error stay visible.
    pub fn stop(&self) {
        if let Some(session) = self.lock_session().take() {
            session.cancel(&self.store);
            tracing::info!(
                flight = %session.flight_number,
                session = session.id,
                "Stopped tracking"
            );
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<TrackingSession>> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for TrackingController {
    fn drop(&mut self) {
        self.stop();
    }
}

struct PollLoop {
    id: SessionId,
    flight_number: String,
    repository: TrackingRepository,
    store: TrackingStore,
    interval: Duration,
}

impl PollLoop {
    async fn run(self, token: CancellationToken) {
        loop {
            if !self.store.update_session(self.id, |state| state.is_loading = true) {
                break;
            }

            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                outcome = self.fetch() => outcome,
            };

            let settled = self
                .store
                .update_session(self.id, |state| settle(state, &self.flight_number, outcome));
            if !settled {
                break;
            }

            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::debug!(
            flight = %self.flight_number,
            session = self.id,
            "Polling loop finished"
        );
    }

    async fn fetch(&self) -> Result<Vec<FlightSnapshot>, String> {
        let result = AssertUnwindSafe(self.repository.get_flight_info(&self.flight_number))
            .catch_unwind()
            .await;

        match result {
            Ok(outcome) => outcome.map_err(|e| e.to_string()),
            Err(panic_info) => {
                let message = panic_message(panic_info.as_ref());
                tracing::error!(
                    flight = %self.flight_number,
                    error = %message,
                    "Flight fetch panicked"
                );
                Err(message)
            }
        }
    }
}

fn settle(
    state: &mut TrackingState,
    flight_number: &str,
    outcome: Result<Vec<FlightSnapshot>, String>,
) {
    match outcome {
        Ok(flights) if flights.is_empty() => {
            state.last_flights.clear();
            state.last_error = Some(format!("No flight data found for {flight_number}"));
            state.updated_at = Some(Utc::now());
        }
        Ok(flights) => {
            state.last_flights = flights;
            state.last_error = None;
            state.updated_at = Some(Utc::now());
        }
        Err(message) => {
            state.last_error = Some(format!("Error: {message}"));
        }
    }
    state.is_loading = false;
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
