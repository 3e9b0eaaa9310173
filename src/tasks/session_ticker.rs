//! Session ticker background task

use std::{sync::Arc, time::Duration};

use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info, warn};

use crate::{
    services::{audio, Notifier},
    state::{session::BREAK_MINUTES, AppState, CompletedPhase, Phase, TickOutcome},
};

/// Background task that delivers one tick per elapsed second while the
/// session is running.
///
/// The task parks on the run-state channel while idle and disarms as
/// soon as the flag drops — a pause, reset, or the completion
/// transition itself stops the cadence without an extra tick. The
/// stale-tick guard inside the session covers the remaining race with
/// an in-flight tick.
pub async fn session_ticker_task(state: Arc<AppState>, notifier: Notifier, mute: bool) {
    info!("Starting session ticker task");

    let mut run_rx = state.subscribe_run_state();

    loop {
        // Park until the session starts running.
        while !*run_rx.borrow_and_update() {
            if run_rx.changed().await.is_err() {
                debug!("Run state channel closed, ticker stopping");
                return;
            }
        }

        debug!("Session running, ticker armed");
        // First tick lands one full second after arming.
        let mut interval = interval_at(
            Instant::now() + Duration::from_secs(1),
            Duration::from_secs(1),
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match state.tick_session() {
                        Ok(TickOutcome::Counted) => {}
                        Ok(TickOutcome::PhaseCompleted(done)) => {
                            dispatch_completion(&done, &notifier, mute).await;
                            break;
                        }
                        Ok(TickOutcome::Ignored) => {
                            // Paused between the disarm edge and this tick.
                            debug!("Stale tick ignored");
                            break;
                        }
                        Err(e) => {
                            error!("Failed to tick session: {}", e);
                            break;
                        }
                    }
                }

                changed = run_rx.changed() => {
                    if changed.is_err() {
                        debug!("Run state channel closed, ticker stopping");
                        return;
                    }
                    if !*run_rx.borrow() {
                        debug!("Session stopped, ticker disarmed");
                        break;
                    }
                }
            }
        }
    }
}

/// Fire the completion side effects: audio cue unconditionally, then
/// the notification when permission allows. Neither can fail the
/// transition that already happened.
async fn dispatch_completion(done: &CompletedPhase, notifier: &Notifier, mute: bool) {
    info!(
        "{} interval complete, {} work session(s) finished",
        done.finished.as_str(),
        done.completed_work_sessions
    );

    if mute {
        debug!("Audio cue muted by configuration");
    } else {
        match tokio::task::spawn_blocking(audio::play_completion_cue).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to play completion cue: {}", e),
            Err(e) => warn!("Completion cue task failed: {}", e),
        }
    }

    let (summary, body) = completion_message(done);
    notifier.notify(summary, &body);
}

fn completion_message(done: &CompletedPhase) -> (&'static str, String) {
    match done.finished {
        Phase::Work => (
            "Pomodoro complete",
            format!(
                "Work session complete! Time for a {}-minute break.",
                BREAK_MINUTES
            ),
        ),
        Phase::Break => (
            "Break over",
            "Break is over! Start the timer when you are ready for the next work session."
                .to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_message_depends_on_finished_phase() {
        let work_done = CompletedPhase {
            finished: Phase::Work,
            next: Phase::Break,
            completed_work_sessions: 1,
        };
        let (summary, body) = completion_message(&work_done);
        assert_eq!(summary, "Pomodoro complete");
        assert!(body.contains("5-minute break"));

        let break_done = CompletedPhase {
            finished: Phase::Break,
            next: Phase::Work,
            completed_work_sessions: 1,
        };
        let (summary, body) = completion_message(&break_done);
        assert_eq!(summary, "Break over");
        assert!(body.contains("work session"));
    }
}
