//! Countdown session state machine

use serde::Serialize;

/// Fixed break length in minutes
pub const BREAK_MINUTES: u64 = 5;
/// Default work interval length in minutes
pub const DEFAULT_WORK_MINUTES: u64 = 25;
/// Smallest configurable work interval in minutes
pub const MIN_WORK_MINUTES: u64 = 1;
/// Largest configurable work interval in minutes
pub const MAX_WORK_MINUTES: u64 = 60;

/// The two countdown phases of a pomodoro cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Break => "break",
        }
    }
}

/// What a single tick did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session was not running; the tick was stale and changed nothing
    Ignored,
    /// One second was consumed, countdown continues
    Counted,
    /// The countdown hit zero and the session moved to the next phase
    PhaseCompleted(CompletedPhase),
}

/// Emitted exactly once per phase completion; consumed by the ticker
/// to drive the audio cue and notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPhase {
    pub finished: Phase,
    pub next: Phase,
    pub completed_work_sessions: u64,
}

/// Session state for the countdown timer.
///
/// Fields are private so every mutation goes through the operations
/// below; `remaining_seconds <= total_duration_seconds` holds at all
/// times and only `tick()` may move the phase forward.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    phase: Phase,
    work_duration_seconds: u64,
    total_duration_seconds: u64,
    remaining_seconds: u64,
    is_running: bool,
    is_focus_mode: bool,
    completed_work_sessions: u64,
}

impl SessionState {
    /// Create an idle Work session. Out-of-range minutes are clamped,
    /// mirroring the tolerant numeric input of the duration control.
    pub fn new(work_minutes: u64) -> Self {
        let work_duration_seconds = clamp_work_minutes(work_minutes) * 60;
        Self {
            phase: Phase::Work,
            work_duration_seconds,
            total_duration_seconds: work_duration_seconds,
            remaining_seconds: work_duration_seconds,
            is_running: false,
            is_focus_mode: false,
            completed_work_sessions: 0,
        }
    }

    // ---------------- getters ----------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn total_duration_seconds(&self) -> u64 {
        self.total_duration_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_focus_mode(&self) -> bool {
        self.is_focus_mode
    }

    pub fn completed_work_sessions(&self) -> u64 {
        self.completed_work_sessions
    }

    /// The configured Work length, independent of the current phase
    pub fn work_duration_seconds(&self) -> u64 {
        self.work_duration_seconds
    }

    // ---------------- operations ----------------

    /// Start (or resume) the countdown and enter focus mode.
    pub fn start(&mut self) {
        self.is_running = true;
        self.is_focus_mode = true;
    }

    /// Stop the countdown and leave focus mode. Idempotent.
    pub fn pause(&mut self) {
        self.is_running = false;
        self.is_focus_mode = false;
    }

    /// Force the session back to an idle Work interval at the configured
    /// work duration, whatever state it was in.
    pub fn reset(&mut self) {
        self.is_running = false;
        self.is_focus_mode = false;
        self.phase = Phase::Work;
        self.total_duration_seconds = self.work_duration_seconds;
        self.remaining_seconds = self.work_duration_seconds;
    }

    /// Update the configured Work duration. No-op while running; the
    /// input is clamped to the valid range rather than rejected.
    ///
    /// Returns `true` when the configuration was applied.
    pub fn set_work_duration(&mut self, minutes: u64) -> bool {
        if self.is_running {
            return false;
        }

        self.work_duration_seconds = clamp_work_minutes(minutes) * 60;

        // Only a Work interval picks up the new length immediately; a
        // paused Break keeps its own remaining time.
        if self.phase == Phase::Work {
            self.total_duration_seconds = self.work_duration_seconds;
            self.remaining_seconds = self.work_duration_seconds;
        }

        true
    }

    /// A tap on the timer face while in focus mode pauses the session.
    ///
    /// Returns `true` when the tap was acted on.
    pub fn focus_tap(&mut self) -> bool {
        if self.is_focus_mode && self.is_running {
            self.pause();
            return true;
        }
        false
    }

    /// Consume one second of countdown time.
    ///
    /// Guards against stale delivery: a tick that lands after the ticker
    /// was disarmed sees `is_running == false` and is ignored. Reaching
    /// zero performs the phase transition and leaves the new phase idle,
    /// so the same call can never decrement twice or transition twice.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::Ignored;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return TickOutcome::Counted;
        }

        let finished = self.phase;
        self.is_running = false;
        self.is_focus_mode = false;

        match finished {
            Phase::Work => {
                self.completed_work_sessions += 1;
                self.phase = Phase::Break;
                self.total_duration_seconds = BREAK_MINUTES * 60;
            }
            Phase::Break => {
                self.phase = Phase::Work;
                self.total_duration_seconds = self.work_duration_seconds;
            }
        }
        self.remaining_seconds = self.total_duration_seconds;

        TickOutcome::PhaseCompleted(CompletedPhase {
            finished,
            next: self.phase,
            completed_work_sessions: self.completed_work_sessions,
        })
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_WORK_MINUTES)
    }
}

fn clamp_work_minutes(minutes: u64) -> u64 {
    minutes.clamp(MIN_WORK_MINUTES, MAX_WORK_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_completion(session: &mut SessionState) -> CompletedPhase {
        session.start();
        let total = session.total_duration_seconds();
        for _ in 0..total - 1 {
            assert_eq!(session.tick(), TickOutcome::Counted);
        }
        match session.tick() {
            TickOutcome::PhaseCompleted(done) => done,
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn new_session_is_idle_work() {
        let session = SessionState::new(25);
        assert_eq!(session.phase(), Phase::Work);
        assert_eq!(session.remaining_seconds(), 1500);
        assert_eq!(session.total_duration_seconds(), 1500);
        assert!(!session.is_running());
        assert!(!session.is_focus_mode());
        assert_eq!(session.completed_work_sessions(), 0);
    }

    #[test]
    fn start_enters_focus_mode() {
        let mut session = SessionState::new(25);
        session.start();
        assert!(session.is_running());
        assert!(session.is_focus_mode());
    }

    #[test]
    fn pause_is_idempotent() {
        let mut session = SessionState::new(25);
        session.start();
        session.tick();
        session.pause();
        let once = session.clone();
        session.pause();
        assert_eq!(session.remaining_seconds(), once.remaining_seconds());
        assert_eq!(session.is_running(), once.is_running());
        assert_eq!(session.is_focus_mode(), once.is_focus_mode());
    }

    #[test]
    fn tick_is_ignored_while_paused() {
        let mut session = SessionState::new(25);
        session.start();
        session.tick();
        session.pause();
        let frozen = session.remaining_seconds();
        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.remaining_seconds(), frozen);
    }

    #[test]
    fn full_work_interval_completes_exactly_once() {
        let mut session = SessionState::new(25);
        let done = run_to_completion(&mut session);

        assert_eq!(done.finished, Phase::Work);
        assert_eq!(done.next, Phase::Break);
        assert_eq!(done.completed_work_sessions, 1);

        assert_eq!(session.phase(), Phase::Break);
        assert_eq!(session.remaining_seconds(), BREAK_MINUTES * 60);
        assert!(!session.is_running());
        assert!(!session.is_focus_mode());
        assert_eq!(session.completed_work_sessions(), 1);

        // The new phase starts idle; the next tick must be stale.
        assert_eq!(session.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn break_completion_restores_configured_work_duration() {
        let mut session = SessionState::new(15);
        run_to_completion(&mut session);
        assert_eq!(session.phase(), Phase::Break);

        let done = run_to_completion(&mut session);
        assert_eq!(done.finished, Phase::Break);
        assert_eq!(done.next, Phase::Work);
        // Break completion does not count as a work session.
        assert_eq!(done.completed_work_sessions, 1);

        assert_eq!(session.phase(), Phase::Work);
        assert_eq!(session.remaining_seconds(), 15 * 60);
        assert!(!session.is_running());
    }

    #[test]
    fn set_work_duration_round_trip_through_reset() {
        let mut session = SessionState::new(45);
        assert!(session.set_work_duration(25));
        session.reset();
        assert_eq!(session.phase(), Phase::Work);
        assert_eq!(session.remaining_seconds(), 1500);
        assert!(!session.is_running());
    }

    #[test]
    fn set_work_duration_clamps_out_of_range_input() {
        let mut session = SessionState::new(25);
        session.set_work_duration(70);
        assert_eq!(session.remaining_seconds(), 60 * 60);
        session.set_work_duration(0);
        assert_eq!(session.remaining_seconds(), 60);
    }

    #[test]
    fn set_work_duration_rejected_while_running() {
        let mut session = SessionState::new(25);
        session.start();
        session.tick();
        let before = session.clone();
        assert!(!session.set_work_duration(10));
        assert_eq!(session.remaining_seconds(), before.remaining_seconds());
        assert_eq!(
            session.work_duration_seconds(),
            before.work_duration_seconds()
        );
    }

    #[test]
    fn set_work_duration_during_idle_break_leaves_break_untouched() {
        let mut session = SessionState::new(25);
        run_to_completion(&mut session);
        assert_eq!(session.phase(), Phase::Break);

        assert!(session.set_work_duration(45));
        assert_eq!(session.remaining_seconds(), BREAK_MINUTES * 60);
        assert_eq!(session.total_duration_seconds(), BREAK_MINUTES * 60);

        // The new work length shows up once the break finishes.
        run_to_completion(&mut session);
        assert_eq!(session.remaining_seconds(), 45 * 60);
    }

    #[test]
    fn focus_tap_while_running_matches_pause() {
        let mut session = SessionState::new(25);
        session.start();
        assert!(session.focus_tap());
        assert!(!session.is_running());
        assert!(!session.is_focus_mode());
    }

    #[test]
    fn focus_tap_outside_focus_mode_is_inert() {
        let mut session = SessionState::new(25);
        assert!(!session.focus_tap());
        session.start();
        session.pause();
        assert!(!session.focus_tap());
    }

    #[test]
    fn reset_during_break_returns_to_idle_work() {
        let mut session = SessionState::new(25);
        run_to_completion(&mut session);
        session.start();
        session.tick();
        session.reset();

        assert_eq!(session.phase(), Phase::Work);
        assert_eq!(session.remaining_seconds(), 1500);
        assert!(!session.is_running());
        assert!(!session.is_focus_mode());
        // Completed count survives a reset.
        assert_eq!(session.completed_work_sessions(), 1);
    }
}
