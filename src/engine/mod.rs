//! Core interpreter engine.
//!
//! Implements the run/step/reset loop shared by every simulator:
//! - [`World`]: the mutable state a script acts on
//! - [`Simulator`]: owns one world and at most one session
//! - [`stepper::Session`]: the line-by-line state machine
//! - [`clock`]: pacing without real timers in the core
//! - [`guard`]: stop-on-violation bounds check
//! - [`rng`]: deterministic target placement

pub mod clock;
pub mod guard;
pub mod rng;
pub mod stepper;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub use clock::{Pacer, ThreadPacer, VirtualClock};
pub use guard::BoundsGuard;
pub use rng::SimRng;
pub use stepper::Session;

use crate::config::PacingConfig;
use crate::error::SimResult;
use crate::renderers::View;
use crate::script::{Line, Script};

/// What applying one command did to the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing changed; idle pacing.
    Idle,
    /// World changed; render, then effect pacing.
    Changed,
    /// Nothing changed; pause for the given time instead of the default.
    Wait(Duration),
}

/// Result of a concluded play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Turtle ended on the target.
    Win,
    /// Turtle ended anywhere else.
    Lose,
}

/// Mutable state a script runs against.
pub trait World: Debug {
    /// Typed form of one script line.
    type Command: Debug + Clone + PartialEq;

    /// Decode a non-blank line. Unknown commands decode to a no-op.
    fn decode(&self, line: &Line) -> Self::Command;

    /// Apply a decoded command.
    ///
    /// # Errors
    ///
    /// Returns an error that aborts the run (an invalid move).
    fn apply(&mut self, command: &Self::Command) -> SimResult<Effect>;

    /// Restore the initial state, ending any play session.
    fn reset(&mut self);

    /// Prepare for a run of `script`; returning `false` refuses the run.
    fn begin_run(&mut self, _script: &Script) -> bool {
        true
    }

    /// Called once after an error-free, uncancelled run.
    fn conclude(&mut self) -> Option<Verdict> {
        None
    }
}

/// Cooperative cancellation flag, shareable across threads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an un-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; observed at the next step boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every line ran; no verdict applies.
    Completed,
    /// Every line ran and the play session was won.
    Won,
    /// Every line ran and the play session was lost.
    Lost,
    /// A line failed; later lines were skipped.
    Aborted {
        /// Zero-based index of the failing line.
        line: usize,
    },
    /// Reset arrived mid-run.
    Cancelled,
}

impl RunOutcome {
    /// True if every line ran.
    #[must_use]
    pub const fn ran_to_end(&self) -> bool {
        matches!(self, Self::Completed | Self::Won | Self::Lost)
    }
}

impl From<Verdict> for RunOutcome {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Win => Self::Won,
            Verdict::Lose => Self::Lost,
        }
    }
}

/// One call to [`Simulator::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Suspension point: wait this long, then advance again.
    Pause(Duration),
    /// The session ended; reported exactly once.
    Finished(RunOutcome),
    /// No session.
    Idle,
}

/// One simulator instance: a world plus at most one execution session.
#[derive(Debug)]
pub struct Simulator<W: World> {
    world: W,
    pacing: PacingConfig,
    session: Option<Session>,
}

impl<W: World> Simulator<W> {
    /// Create a simulator around `world`.
    #[must_use]
    pub const fn new(world: W, pacing: PacingConfig) -> Self {
        Self {
            world,
            pacing,
            session: None,
        }
    }

    /// Read access to the world.
    #[must_use]
    pub const fn world(&self) -> &W {
        &self.world
    }

    /// Pacing in effect for new sessions.
    #[must_use]
    pub const fn pacing(&self) -> &PacingConfig {
        &self.pacing
    }

    /// Change pacing; applies from the next run.
    pub fn set_pacing(&mut self, pacing: PacingConfig) {
        self.pacing = pacing;
    }

    /// True while a session is active and not cancelled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_active)
    }

    /// Token of the active session, for cancelling from elsewhere.
    #[must_use]
    pub fn cancel_token(&self) -> Option<CancelToken> {
        self.session.as_ref().map(|s| s.cancel_token().clone())
    }

    /// Start a session for `text`.
    ///
    /// Returns `false` if a session is already running or the world
    /// refuses the script; the request is dropped, not queued.
    pub fn run(&mut self, text: &str) -> bool {
        if self.is_running() {
            log::debug!("run request ignored: a session is already active");
            return false;
        }

        let script = Script::parse(text);
        if !self.world.begin_run(&script) {
            log::debug!("run request ignored: script refused");
            return false;
        }

        log::info!("session started ({} lines)", script.len());
        self.session = Some(Session::new(script, self.pacing.clone()));
        true
    }

    /// Drive the active session to its next suspension point.
    pub fn advance<V: View<W>>(&mut self, view: &mut V) -> Step {
        let Some(session) = self.session.as_mut() else {
            return Step::Idle;
        };

        let step = session.advance(&mut self.world, view);
        if let Step::Finished(outcome) = step {
            log::info!("session finished: {outcome:?}");
            self.session = None;
        }
        step
    }

    /// Cancel any active session and restore the initial world.
    pub fn reset<V: View<W>>(&mut self, view: &mut V) {
        if let Some(session) = &self.session {
            session.cancel_token().cancel();
        }
        self.world.reset();
        view.render(&self.world);
    }

    /// Run `text` to completion, handing each pause to `pacer`.
    ///
    /// Returns `None` if the run request was ignored.
    pub fn run_blocking<V: View<W>, P: Pacer>(
        &mut self,
        text: &str,
        view: &mut V,
        pacer: &mut P,
    ) -> Option<RunOutcome> {
        if !self.run(text) {
            return None;
        }
        loop {
            match self.advance(view) {
                Step::Pause(duration) => pacer.pause(duration),
                Step::Finished(outcome) => return Some(outcome),
                Step::Idle => return None,
            }
        }
    }

    pub(crate) fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::{EventLog, ViewEvent};
    use crate::simulators::turtle::TurtleWorld;

    fn instant_turtle() -> Simulator<TurtleWorld> {
        Simulator::new(TurtleWorld::default(), PacingConfig::instant())
    }

    #[test]
    fn test_cancel_token_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_verdict_into_outcome() {
        assert_eq!(RunOutcome::from(Verdict::Win), RunOutcome::Won);
        assert_eq!(RunOutcome::from(Verdict::Lose), RunOutcome::Lost);
        assert!(RunOutcome::Lost.ran_to_end());
        assert!(!RunOutcome::Cancelled.ran_to_end());
        assert!(!RunOutcome::Aborted { line: 0 }.ran_to_end());
    }

    #[test]
    fn test_advance_without_session_is_idle() {
        let mut sim = instant_turtle();
        let mut log: EventLog<TurtleWorld> = EventLog::new();
        assert_eq!(sim.advance(&mut log), Step::Idle);
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_concurrent_run_ignored() {
        let mut sim = instant_turtle();
        assert!(sim.run("ANDA 1"));
        assert!(sim.is_running());
        assert!(!sim.run("ANDA 2"));
    }

    #[test]
    fn test_finished_reported_once() {
        let mut sim = instant_turtle();
        let mut log: EventLog<TurtleWorld> = EventLog::new();
        let mut clock = VirtualClock::new();
        let outcome = sim.run_blocking("ANDA 1", &mut log, &mut clock);
        assert_eq!(outcome, Some(RunOutcome::Completed));
        assert!(!sim.is_running());
        assert_eq!(sim.advance(&mut log), Step::Idle);
    }

    #[test]
    fn test_reset_cancels_and_allows_new_run() {
        let mut sim = instant_turtle();
        let mut log: EventLog<TurtleWorld> = EventLog::new();
        assert!(sim.run("ANDA 1\nANDA 1\nANDA 1"));
        assert!(matches!(sim.advance(&mut log), Step::Pause(_)));

        sim.reset(&mut log);
        assert!(!sim.is_running());
        assert_eq!(sim.advance(&mut log), Step::Finished(RunOutcome::Cancelled));
        assert!(sim.run("ANDA 2"));
    }

    #[test]
    fn test_reset_renders_home_pose() {
        let mut sim = instant_turtle();
        let mut log: EventLog<TurtleWorld> = EventLog::new();
        let mut clock = VirtualClock::new();
        sim.run_blocking("ANDA 3", &mut log, &mut clock);
        log.clear();

        sim.reset(&mut log);
        let rendered = log.renders();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].pose().x, 0.0);
        assert!(matches!(log.events()[0], ViewEvent::Render { .. }));
    }

    #[test]
    fn test_cancel_token_from_simulator() {
        let mut sim = instant_turtle();
        let mut log: EventLog<TurtleWorld> = EventLog::new();
        assert!(sim.cancel_token().is_none());
        sim.run("ANDA 1\nANDA 1");
        let token = sim.cancel_token().expect("session active");
        token.cancel();
        assert_eq!(sim.advance(&mut log), Step::Finished(RunOutcome::Cancelled));
    }
}
