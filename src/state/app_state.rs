//! Main application state management

use std::{sync::Mutex, time::Instant};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::render::{render_face, TimerFace};

use super::session::{SessionState, TickOutcome};

/// Main application state: the countdown session plus the channels that
/// fan its changes out to the ticker and any watching surface.
#[derive(Debug)]
pub struct AppState {
    /// The single source of truth for the countdown
    session: Mutex<SessionState>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last user action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Arms and disarms the session ticker
    run_state_tx: watch::Sender<bool>,
    /// Latest rendered timer face
    face_tx: watch::Sender<TimerFace>,
    /// Keep the receivers alive to prevent channel closure
    _run_state_rx: watch::Receiver<bool>,
    _face_rx: watch::Receiver<TimerFace>,
}

impl AppState {
    /// Create a new AppState with an idle Work session
    pub fn new(port: u16, host: String, work_minutes: u64) -> Self {
        let session = SessionState::new(work_minutes);
        let face = render_face(
            session.remaining_seconds(),
            session.total_duration_seconds(),
            session.phase(),
            session.is_running(),
        );

        let (run_state_tx, run_state_rx) = watch::channel(false);
        let (face_tx, face_rx) = watch::channel(face);

        Self {
            session: Mutex::new(session),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            run_state_tx,
            face_tx,
            _run_state_rx: run_state_rx,
            _face_rx: face_rx,
        }
    }

    /// Apply a user operation to the session and fan out the new state.
    ///
    /// Renders the face, refreshes the ticker arm flag, and records the
    /// action for `/status`. Returns the closure result alongside a
    /// snapshot of the post-operation session.
    pub fn update_session<F, R>(&self, action: &str, updater: F) -> Result<(SessionState, R), String>
    where
        F: FnOnce(&mut SessionState) -> R,
    {
        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Failed to lock session state: {}", e))?;

        let result = updater(&mut session);
        let snapshot = session.clone();
        drop(session); // Release the lock before fan-out

        self.publish(&snapshot);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        debug!("Applied '{}', session now {:?}", action, snapshot);
        Ok((snapshot, result))
    }

    /// Consume one countdown second on behalf of the ticker.
    ///
    /// Ticks are not user actions, so last-action tracking is left
    /// alone; the face and arm flag still refresh.
    pub fn tick_session(&self) -> Result<TickOutcome, String> {
        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Failed to lock session state: {}", e))?;

        let outcome = session.tick();
        let snapshot = session.clone();
        drop(session);

        self.publish(&snapshot);
        Ok(outcome)
    }

    /// Get a snapshot of the current session
    pub fn snapshot(&self) -> Result<SessionState, String> {
        self.session
            .lock()
            .map(|session| session.clone())
            .map_err(|e| format!("Failed to lock session state: {}", e))
    }

    /// The most recently rendered timer face
    pub fn current_face(&self) -> TimerFace {
        self.face_tx.borrow().clone()
    }

    /// Receiver the ticker waits on for arm/disarm edges
    pub fn subscribe_run_state(&self) -> watch::Receiver<bool> {
        self.run_state_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn publish(&self, session: &SessionState) {
        let face = render_face(
            session.remaining_seconds(),
            session.total_duration_seconds(),
            session.phase(),
            session.is_running(),
        );
        if let Err(e) = self.face_tx.send(face) {
            warn!("Failed to publish timer face: {}", e);
        }
        // Only real edges wake the ticker; every-tick sends would.
        self.run_state_tx.send_if_modified(|running| {
            if *running != session.is_running() {
                *running = session.is_running();
                true
            } else {
                false
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Phase;

    #[test]
    fn update_session_publishes_face_and_run_state() {
        let state = AppState::new(0, "127.0.0.1".to_string(), 25);
        let mut run_rx = state.subscribe_run_state();

        let (snapshot, _) = state.update_session("start", |s| s.start()).unwrap();
        assert!(snapshot.is_running());
        assert!(*run_rx.borrow_and_update());
        assert!(state.current_face().glow);
    }

    #[test]
    fn tick_session_reports_completion_and_disarms() {
        let state = AppState::new(0, "127.0.0.1".to_string(), 1);
        state.update_session("start", |s| s.start()).unwrap();

        for _ in 0..59 {
            assert_eq!(state.tick_session().unwrap(), TickOutcome::Counted);
        }
        match state.tick_session().unwrap() {
            TickOutcome::PhaseCompleted(done) => {
                assert_eq!(done.finished, Phase::Work);
                assert_eq!(done.completed_work_sessions, 1);
            }
            other => panic!("expected completion, got {other:?}"),
        }

        assert!(!*state.subscribe_run_state().borrow());
        // A stale tick after the disarm edge is harmless.
        assert_eq!(state.tick_session().unwrap(), TickOutcome::Ignored);
    }

    #[test]
    fn last_action_tracks_user_operations_not_ticks() {
        let state = AppState::new(0, "127.0.0.1".to_string(), 25);
        state.update_session("start", |s| s.start()).unwrap();
        state.tick_session().unwrap();

        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("start"));
        assert!(time.is_some());
    }
}
