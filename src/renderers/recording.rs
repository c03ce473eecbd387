//! Recording view.
//!
//! Captures every view call in order, with a snapshot of the world for each
//! render. Used by tests and by the wasm binding, which drains it into a
//! JSON frame after every advance.

use serde::Serialize;

use super::{LineHighlighter, Notice, Notifier, Renderer};
use crate::engine::{RunOutcome, Step};

/// One recorded view call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ViewEvent<W> {
    /// World snapshot passed to `render`.
    Render {
        /// State at the time of the call.
        world: W,
    },
    /// Highlight toggled.
    Active {
        /// Zero-based line.
        line: usize,
        /// New highlight state.
        active: bool,
    },
    /// Line flagged as failed.
    Failed {
        /// Zero-based line.
        line: usize,
    },
    /// Notice delivered.
    Notice {
        /// The notice.
        notice: Notice,
        /// Its message text.
        message: String,
    },
}

/// Ordered log of view calls.
#[derive(Debug, Clone, Serialize)]
pub struct EventLog<W> {
    events: Vec<ViewEvent<W>>,
}

impl<W> Default for EventLog<W> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<W> EventLog<W> {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[ViewEvent<W>] {
        &self.events
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Take the recorded events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<ViewEvent<W>> {
        std::mem::take(&mut self.events)
    }

    /// Package `step` with everything recorded since the last frame.
    pub fn frame(&mut self, step: Step) -> Frame<W> {
        Frame {
            step: step.into(),
            events: self.drain(),
        }
    }

    /// World snapshots, in render order.
    #[must_use]
    pub fn renders(&self) -> Vec<&W> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Render { world } => Some(world),
                _ => None,
            })
            .collect()
    }

    /// Delivered notices, in order.
    #[must_use]
    pub fn notices(&self) -> Vec<&Notice> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Notice { notice, .. } => Some(notice),
                _ => None,
            })
            .collect()
    }

    /// Lines that were highlighted, in order of activation.
    #[must_use]
    pub fn activated_lines(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Active { line, active: true } => Some(*line),
                _ => None,
            })
            .collect()
    }
}

/// Serializable form of [`Step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepReport {
    /// Call `advance` again after `ms` milliseconds.
    Pause {
        /// Delay in milliseconds.
        ms: u64,
    },
    /// The run ended.
    Finished {
        /// How it ended.
        outcome: RunOutcome,
    },
    /// Nothing is running.
    Idle,
}

impl From<Step> for StepReport {
    fn from(step: Step) -> Self {
        match step {
            Step::Pause(duration) => Self::Pause {
                ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            },
            Step::Finished(outcome) => Self::Finished { outcome },
            Step::Idle => Self::Idle,
        }
    }
}

/// One advance worth of view activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame<W> {
    /// What the driver should do next.
    pub step: StepReport,
    /// View calls made during the advance, oldest first.
    pub events: Vec<ViewEvent<W>>,
}

impl<W: Clone> Renderer<W> for EventLog<W> {
    fn render(&mut self, world: &W) {
        self.events.push(ViewEvent::Render {
            world: world.clone(),
        });
    }
}

impl<W> LineHighlighter for EventLog<W> {
    fn set_active(&mut self, line: usize, active: bool) {
        self.events.push(ViewEvent::Active { line, active });
    }

    fn mark_failed(&mut self, line: usize) {
        self.events.push(ViewEvent::Failed { line });
    }
}

impl<W> Notifier for EventLog<W> {
    fn notify(&mut self, notice: &Notice) {
        self.events.push(ViewEvent::Notice {
            notice: notice.clone(),
            message: notice.message().to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut log: EventLog<u32> = EventLog::new();
        log.render(&1);
        log.set_active(0, true);
        log.notify(&Notice::Won);
        log.mark_failed(0);
        log.render(&2);

        assert_eq!(log.events().len(), 5);
        assert_eq!(log.renders(), vec![&1, &2]);
        assert_eq!(log.notices(), vec![&Notice::Won]);
        assert_eq!(log.activated_lines(), vec![0]);
        assert_eq!(log.events()[3], ViewEvent::Failed { line: 0 });
    }

    #[test]
    fn test_drain_empties() {
        let mut log: EventLog<u32> = EventLog::new();
        log.set_active(1, true);
        let drained = log.drain();
        assert_eq!(drained.len(), 1);
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_frame_drains_log() {
        let mut log: EventLog<u32> = EventLog::new();
        log.set_active(0, true);
        let frame = log.frame(Step::Pause(std::time::Duration::from_millis(600)));
        assert_eq!(frame.step, StepReport::Pause { ms: 600 });
        assert_eq!(frame.events.len(), 1);
        assert!(log.events().is_empty());

        let done = log.frame(Step::Finished(RunOutcome::Lost));
        let json = serde_json::to_string(&done).expect("serialize");
        assert_eq!(
            json,
            r#"{"step":{"kind":"finished","outcome":{"outcome":"lost"}},"events":[]}"#
        );
    }

    #[test]
    fn test_json_event_shape() {
        let mut log: EventLog<u32> = EventLog::new();
        log.set_active(2, false);
        let json = serde_json::to_string(log.events()).expect("serialize");
        assert_eq!(json, r#"[{"event":"active","line":2,"active":false}]"#);
    }
}
