//! View interfaces for simulators.
//!
//! The engine never draws anything itself. It reports through three small
//! traits, and every concrete view (terminal, recording log, browser
//! binding) implements the subset it cares about:
//!
//! ```text
//!              Session
//!       ┌─────────┼──────────┐
//!       ↓         ↓          ↓
//!   Renderer  LineHighlighter  Notifier
//!       └─────────┼──────────┘
//!                View
//!       ┌─────────┼──────────┐
//!   TerminalView  EventLog  Wasm*
//! ```

pub mod recording;
pub mod terminal;
#[cfg(feature = "wasm")]
pub mod wasm;

use serde::{Deserialize, Serialize};

use crate::engine::Verdict;
use crate::error::SimError;
use crate::simulators::turtle::Square;

pub use recording::{EventLog, Frame, StepReport, ViewEvent};
pub use terminal::TerminalView;

/// Draws the current world.
pub trait Renderer<W> {
    /// Called at run start, after every effecting step, and after
    /// reset, play and conclusion.
    fn render(&mut self, world: &W);
}

/// Marks script lines as they execute.
pub trait LineHighlighter {
    /// Toggle the highlight of a zero-based line.
    fn set_active(&mut self, line: usize, active: bool);

    /// Flag a line whose command aborted the run.
    fn mark_failed(&mut self, _line: usize) {}
}

/// Receives user-facing messages.
pub trait Notifier {
    /// Deliver one notice.
    fn notify(&mut self, notice: &Notice);
}

/// Everything the engine reports to.
pub trait View<W>: Renderer<W> + LineHighlighter + Notifier {}

impl<W, T: Renderer<W> + LineHighlighter + Notifier> View<W> for T {}

/// A user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// A move would have left the board.
    InvalidMove {
        /// Zero-based index of the offending line.
        line: usize,
        /// Rejected x coordinate.
        x: f64,
        /// Rejected y coordinate.
        y: f64,
    },
    /// The play session was won.
    Won,
    /// The play session was lost.
    Lost,
    /// A play session started.
    GameStarted {
        /// Where the apple was placed.
        target: Square,
    },
}

impl Notice {
    /// Build the notice for an error raised by `line`.
    #[must_use]
    pub fn from_error(line: usize, error: &SimError) -> Self {
        match *error {
            SimError::InvalidMove { x, y } => Self::InvalidMove { line, x, y },
            _ => Self::InvalidMove {
                line,
                x: f64::NAN,
                y: f64::NAN,
            },
        }
    }

    /// Text shown to the learner.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::InvalidMove { .. } => "Movimento Inválido: A tartaruga sairia do tabuleiro!",
            Self::Won => "Você venceu",
            Self::Lost => "Você perdeu",
            Self::GameStarted { .. } => {
                "MODO JOGO INICIADO!\nObjetivo: Leve a tartaruga até a maçã."
            }
        }
    }
}

impl From<Verdict> for Notice {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Win => Self::Won,
            Verdict::Lose => Self::Lost,
        }
    }
}

/// View that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl<W> Renderer<W> for NullView {
    fn render(&mut self, _world: &W) {}
}

impl LineHighlighter for NullView {
    fn set_active(&mut self, _line: usize, _active: bool) {}
}

impl Notifier for NullView {
    fn notify(&mut self, _notice: &Notice) {}
}
