//! # codestep
//!
//! Step-through command interpreters for small classroom simulators.
//!
//! Three simulators share one engine:
//! - Turtle: moves on a grid with `ANDA`, `TRAS`, `DIREITA`, `ESQUERDA`
//! - Apple game: the turtle with a target cell to reach
//! - LED panel: three LEDs driven by `ACIONAR`, `ESPERAR`, `LIMPAR`
//!
//! A script is parsed into lines and executed one line per step. Every
//! step yields a pacing delay to the caller instead of sleeping, so the
//! same engine drives a terminal, a browser, or a test with a virtual
//! clock.
//!
//! ## Example
//!
//! ```rust
//! use codestep::prelude::*;
//!
//! let config = SimConfig::builder().pacing(PacingConfig::instant()).build();
//! let mut sim = Simulator::turtle(&config);
//! let mut log: EventLog<TurtleWorld> = EventLog::new();
//! let outcome = sim.run_blocking("ANDA 2\nDIREITA 90", &mut log, &mut VirtualClock::new());
//!
//! assert_eq!(outcome, Some(RunOutcome::Completed));
//! assert!((sim.world().pose().x - 2.0).abs() < 1e-9);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod renderers;
pub mod script;
pub mod simulators;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{PacingConfig, SimConfig, SimConfigBuilder, SimKind};
    pub use crate::engine::rng::SimRng;
    pub use crate::engine::{
        BoundsGuard, CancelToken, Effect, Pacer, RunOutcome, Simulator, Step, ThreadPacer, Verdict,
        VirtualClock, World,
    };
    pub use crate::error::{SimError, SimResult};
    pub use crate::renderers::{
        EventLog, LineHighlighter, Notice, Notifier, NullView, Renderer, TerminalView, View,
        ViewEvent,
    };
    pub use crate::script::{Line, Script};
    pub use crate::simulators::{
        LedBank, LedSimulator, Pose, Square, TurtleGame, TurtleSimulator, TurtleWorld,
    };
}

/// Re-export for public API
pub use error::{SimError, SimResult};
