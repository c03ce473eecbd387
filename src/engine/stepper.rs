//! Line-by-line execution state machine.
//!
//! A [`Session`] never blocks. Each call to [`Session::advance`] runs until
//! the next pacing delay and returns it, so one driver can sleep on it, a
//! browser can schedule a timeout, and a test can just count it.
//!
//! ```text
//! Start ──▶ Enter(i) ──pause──▶ Exit(i) ──▶ Enter(i+1) … ──▶ Tail ──pause──▶ Conclude ──▶ Done
//!              │
//!              └─ invalid move ──pause──▶ Tail (remaining lines skipped)
//! ```
//!
//! Cancellation is polled before every phase transition; once observed
//! the session finishes as [`RunOutcome::Cancelled`] without touching the
//! world again.

use crate::config::PacingConfig;
use crate::engine::{CancelToken, Effect, RunOutcome, Step, World};
use crate::renderers::{Notice, View};
use crate::script::Script;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Enter(usize),
    Exit(usize),
    Tail,
    Conclude,
    Done(RunOutcome),
}

/// One execution of a parsed script.
#[derive(Debug)]
pub struct Session {
    script: Script,
    pacing: PacingConfig,
    cancel: CancelToken,
    phase: Phase,
    failed_line: Option<usize>,
    lines_executed: usize,
}

impl Session {
    /// Create a session that has not yet taken its first step.
    #[must_use]
    pub fn new(script: Script, pacing: PacingConfig) -> Self {
        Self {
            script,
            pacing,
            cancel: CancelToken::new(),
            phase: Phase::Start,
            failed_line: None,
            lines_executed: 0,
        }
    }

    /// The script being executed.
    #[must_use]
    pub const fn script(&self) -> &Script {
        &self.script
    }

    /// This session's cancellation token.
    #[must_use]
    pub const fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// True until the session finishes or is cancelled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::Done(_)) && !self.cancel.is_cancelled()
    }

    /// Lines entered so far, blank lines included.
    #[must_use]
    pub const fn lines_executed(&self) -> usize {
        self.lines_executed
    }

    /// Line that aborted the run, if any.
    #[must_use]
    pub const fn failed_line(&self) -> Option<usize> {
        self.failed_line
    }

    /// Run until the next suspension point or the end of the session.
    pub fn advance<W: World, V: View<W>>(&mut self, world: &mut W, view: &mut V) -> Step {
        loop {
            if let Phase::Done(outcome) = self.phase {
                return Step::Finished(outcome);
            }
            if self.cancel.is_cancelled() {
                log::debug!("session cancelled before {:?}", self.phase);
                self.phase = Phase::Done(RunOutcome::Cancelled);
                continue;
            }

            match self.phase {
                Phase::Start => {
                    view.render(world);
                    self.phase = Phase::Enter(0);
                    let settle = self.pacing.settle();
                    if !settle.is_zero() {
                        return Step::Pause(settle);
                    }
                }
                Phase::Enter(index) => {
                    if let Some(step) = self.enter(index, world, view) {
                        return step;
                    }
                }
                Phase::Exit(index) => {
                    view.set_active(index, false);
                    self.phase = Phase::Enter(index + 1);
                }
                Phase::Tail => {
                    self.phase = Phase::Conclude;
                    let tail = self.pacing.tail();
                    if !tail.is_zero() {
                        return Step::Pause(tail);
                    }
                }
                Phase::Conclude => {
                    let outcome = self.conclude(world, view);
                    self.phase = Phase::Done(outcome);
                }
                Phase::Done(_) => {}
            }
        }
    }

    /// Execute line `index`; `None` once past the last line.
    fn enter<W: World, V: View<W>>(
        &mut self,
        index: usize,
        world: &mut W,
        view: &mut V,
    ) -> Option<Step> {
        let Some(line) = self.script.get(index) else {
            self.phase = Phase::Tail;
            return None;
        };

        self.lines_executed += 1;
        view.set_active(index, true);

        if line.is_blank() {
            self.phase = Phase::Exit(index);
            return Some(Step::Pause(self.pacing.blank()));
        }

        let command = world.decode(line);
        log::debug!("line {index}: {command:?}");

        let step = match world.apply(&command) {
            Ok(Effect::Idle) => {
                self.phase = Phase::Exit(index);
                Step::Pause(self.pacing.idle())
            }
            Ok(Effect::Changed) => {
                view.render(world);
                self.phase = Phase::Exit(index);
                Step::Pause(self.pacing.effect())
            }
            Ok(Effect::Wait(duration)) => {
                self.phase = Phase::Exit(index);
                Step::Pause(duration)
            }
            Err(error) => {
                log::warn!("line {index} aborted the run: {error}");
                self.failed_line = Some(index);
                view.notify(&Notice::from_error(index, &error));
                view.mark_failed(index);
                self.phase = Phase::Tail;
                Step::Pause(self.pacing.error())
            }
        };
        Some(step)
    }

    fn conclude<W: World, V: View<W>>(&self, world: &mut W, view: &mut V) -> RunOutcome {
        if let Some(line) = self.failed_line {
            return RunOutcome::Aborted { line };
        }

        match world.conclude() {
            Some(verdict) => {
                view.notify(&Notice::from(verdict));
                view.render(world);
                verdict.into()
            }
            None => RunOutcome::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::{EventLog, ViewEvent};
    use crate::simulators::turtle::TurtleWorld;
    use std::time::Duration;

    fn drive(
        session: &mut Session,
        world: &mut TurtleWorld,
        log: &mut EventLog<TurtleWorld>,
    ) -> (Vec<Duration>, RunOutcome) {
        let mut pauses = Vec::new();
        loop {
            match session.advance(world, log) {
                Step::Pause(d) => pauses.push(d),
                Step::Finished(outcome) => return (pauses, outcome),
                Step::Idle => unreachable!("sessions never report idle"),
            }
        }
    }

    #[test]
    fn test_turtle_pacing_sequence() {
        let mut world = TurtleWorld::default();
        let mut log: EventLog<TurtleWorld> = EventLog::new();
        let script = Script::parse("ANDA 1\n\nPULA\nDIREITA 90");
        let mut session = Session::new(script, PacingConfig::turtle());

        let (pauses, outcome) = drive(&mut session, &mut world, &mut log);
        let ms: Vec<u64> = pauses.iter().map(|d| d.as_millis() as u64).collect();
        assert_eq!(ms, vec![500, 600, 100, 200, 600, 1000]);
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(session.lines_executed(), 4);
    }

    #[test]
    fn test_zero_settle_and_tail_are_skipped() {
        let mut world = TurtleWorld::default();
        let mut log: EventLog<TurtleWorld> = EventLog::new();
        let mut session = Session::new(Script::parse("ANDA 1"), PacingConfig::led());

        let (pauses, _) = drive(&mut session, &mut world, &mut log);
        assert_eq!(pauses, vec![Duration::from_millis(500)]);
    }

    #[test]
    fn test_highlight_brackets_each_line() {
        let mut world = TurtleWorld::default();
        let mut log: EventLog<TurtleWorld> = EventLog::new();
        let mut session = Session::new(Script::parse("ANDA 1\nANDA 1"), PacingConfig::instant());
        drive(&mut session, &mut world, &mut log);

        let highlights: Vec<(usize, bool)> = log
            .events()
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Active { line, active } => Some((*line, *active)),
                _ => None,
            })
            .collect();
        let expected = vec![(0, true), (0, false), (1, true), (1, false)];
        assert_eq!(highlights, expected);
    }

    #[test]
    fn test_invalid_move_skips_remaining_lines() {
        let mut world = TurtleWorld::default();
        let mut log: EventLog<TurtleWorld> = EventLog::new();
        let script = Script::parse("ANDA 10\nDIREITA 90\nANDA 1");
        let mut session = Session::new(script, PacingConfig::turtle());

        let (pauses, outcome) = drive(&mut session, &mut world, &mut log);
        assert_eq!(outcome, RunOutcome::Aborted { line: 0 });
        assert_eq!(session.lines_executed(), 1);
        assert_eq!(session.failed_line(), Some(0));
        let ms: Vec<u64> = pauses.iter().map(|d| d.as_millis() as u64).collect();
        assert_eq!(ms, vec![500, 1000, 1000]);
        assert_eq!(world.pose().heading, 90.0);
        let notices = log.notices();
        assert!(matches!(notices[0], Notice::InvalidMove { line: 0, .. }));
        assert!(log.events().contains(&ViewEvent::Failed { line: 0 }));
    }

    #[test]
    fn test_cancel_between_steps_stops_without_mutation() {
        let mut world = TurtleWorld::default();
        let mut log: EventLog<TurtleWorld> = EventLog::new();
        let script = Script::parse("ANDA 1\nANDA 1\nANDA 1");
        let mut session = Session::new(script, PacingConfig::instant());
        let cancelled = Step::Finished(RunOutcome::Cancelled);

        let first = session.advance(&mut world, &mut log);
        assert!(matches!(first, Step::Pause(_)));
        assert!((world.pose().x - 1.0).abs() < 1e-9);

        session.cancel_token().cancel();
        assert!(!session.is_active());
        assert_eq!(session.advance(&mut world, &mut log), cancelled);
        assert!((world.pose().x - 1.0).abs() < 1e-9);
        assert_eq!(session.lines_executed(), 1);
        assert_eq!(session.advance(&mut world, &mut log), cancelled);
    }

    #[test]
    fn test_cancel_during_tail_skips_conclusion() {
        let mut world = TurtleWorld::default();
        world.set_target(Some(crate::simulators::turtle::Square::new(1, 0)));
        let mut log: EventLog<TurtleWorld> = EventLog::new();
        let mut session = Session::new(Script::parse("ANDA 1"), PacingConfig::game());

        let mut last = Step::Idle;
        for _ in 0..3 {
            last = session.advance(&mut world, &mut log);
        }
        assert_eq!(last, Step::Pause(Duration::from_millis(500)));

        session.cancel_token().cancel();
        let step = session.advance(&mut world, &mut log);
        assert_eq!(step, Step::Finished(RunOutcome::Cancelled));
        assert!(world.is_playing());
        assert!(log.notices().is_empty());
    }

    #[test]
    fn test_empty_script_is_one_blank_step() {
        let mut world = TurtleWorld::default();
        let mut log: EventLog<TurtleWorld> = EventLog::new();
        let mut session = Session::new(Script::parse(""), PacingConfig::instant());
        let (pauses, outcome) = drive(&mut session, &mut world, &mut log);
        assert_eq!(pauses.len(), 1);
        assert_eq!(outcome, RunOutcome::Completed);
    }
}
