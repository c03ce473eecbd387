//! Browser bindings.
//!
//! wasm-bindgen cannot export generic types, so each simulator gets a
//! concrete wrapper around the shared [`WasmRunner`]. JavaScript drives the
//! run by calling `advance()` and scheduling the next call after the
//! returned pause:
//!
//! ```javascript
//! import init, { WasmTurtle } from 'codestep';
//!
//! async function main() {
//!     await init();
//!     const turtle = new WasmTurtle();
//!     turtle.run(editor.value);
//!     const tick = () => {
//!         const frame = JSON.parse(turtle.advance());
//!         frame.events.forEach(draw);
//!         if (frame.step.kind === 'pause') setTimeout(tick, frame.step.ms);
//!     };
//!     tick();
//! }
//! ```

// WASM-bindgen exports don't need #[must_use] - values returned to JS
#![allow(clippy::must_use_candidate)]

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::EventLog;
use crate::config::{SimConfig, SimKind};
use crate::engine::{Simulator, World};
use crate::error::SimError;
use crate::simulators::{LedBank, TurtleGame, TurtleWorld};

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| {
        let error = SimError::serialization(e.to_string());
        JsValue::from_str(&error.to_string())
    })
}

fn browser_seed() -> u64 {
    // Math.random() has 53 bits of mantissa; scaling to u32 keeps it exact.
    (js_sys::Math::random() * f64::from(u32::MAX)) as u64
}

/// Simulator plus the log its view calls are recorded into.
#[derive(Debug)]
pub struct WasmRunner<W: World + Clone + Serialize> {
    sim: Simulator<W>,
    log: EventLog<W>,
}

impl<W: World + Clone + Serialize> WasmRunner<W> {
    /// Wrap a simulator.
    #[must_use]
    pub fn new(sim: Simulator<W>) -> Self {
        Self {
            sim,
            log: EventLog::new(),
        }
    }

    /// Start a run; `false` if it was ignored.
    pub fn run(&mut self, script: &str) -> bool {
        self.sim.run(script)
    }

    /// Advance and return the frame as JSON.
    ///
    /// # Errors
    ///
    /// Returns a JS error if the frame cannot be serialized.
    pub fn advance(&mut self) -> Result<String, JsValue> {
        let step = self.sim.advance(&mut self.log);
        to_json(&self.log.frame(step))
    }

    /// Cancel any run and reset; returns the frame holding the render.
    ///
    /// # Errors
    ///
    /// Returns a JS error if the frame cannot be serialized.
    pub fn reset(&mut self) -> Result<String, JsValue> {
        self.sim.reset(&mut self.log);
        let step = self.sim.advance(&mut self.log);
        to_json(&self.log.frame(step))
    }

    /// Current world as JSON.
    ///
    /// # Errors
    ///
    /// Returns a JS error if the world cannot be serialized.
    pub fn state_json(&self) -> Result<String, JsValue> {
        to_json(self.sim.world())
    }

    /// True while a run is in progress.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.sim.is_running()
    }
}

/// Free-roaming turtle.
#[wasm_bindgen]
#[derive(Debug)]
pub struct WasmTurtle {
    runner: WasmRunner<TurtleWorld>,
}

#[wasm_bindgen]
impl WasmTurtle {
    /// Turtle on the default 8×8 board.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();
        let config = SimConfig::for_kind(SimKind::Turtle);
        Self {
            runner: WasmRunner::new(Simulator::turtle(&config)),
        }
    }

    /// Start a run of `script`.
    pub fn run(&mut self, script: &str) -> bool {
        self.runner.run(script)
    }

    /// Advance the run; JSON `{ step, events }`.
    pub fn advance(&mut self) -> Result<String, JsValue> {
        self.runner.advance()
    }

    /// Cancel and return to the home pose.
    pub fn reset(&mut self) -> Result<String, JsValue> {
        self.runner.reset()
    }

    /// Pose as JSON.
    pub fn state_json(&self) -> Result<String, JsValue> {
        self.runner.state_json()
    }

    /// True while a run is in progress.
    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.runner.is_running()
    }
}

impl Default for WasmTurtle {
    fn default() -> Self {
        Self::new()
    }
}

/// Turtle with the apple game.
#[wasm_bindgen]
#[derive(Debug)]
pub struct WasmTurtleGame {
    game: TurtleGame,
    log: EventLog<TurtleWorld>,
}

#[wasm_bindgen]
impl WasmTurtleGame {
    /// Game seeded from `Math.random()`.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_seed(browser_seed())
    }

    /// Game with a fixed seed, for reproducible sessions.
    pub fn with_seed(seed: u64) -> Self {
        console_error_panic_hook::set_once();
        let config = SimConfig::builder().kind(SimKind::Game).seed(seed).build();
        Self {
            game: TurtleGame::new(&config),
            log: EventLog::new(),
        }
    }

    /// Open a play session; returns the frame announcing the apple.
    pub fn play(&mut self) -> Result<String, JsValue> {
        self.game.play(&mut self.log);
        let step = self.game.advance(&mut self.log);
        to_json(&self.log.frame(step))
    }

    /// Start a run of `script`.
    pub fn run(&mut self, script: &str) -> bool {
        self.game.run(script)
    }

    /// Advance the run; JSON `{ step, events }`.
    pub fn advance(&mut self) -> Result<String, JsValue> {
        let step = self.game.advance(&mut self.log);
        to_json(&self.log.frame(step))
    }

    /// Cancel, end the play session and return home.
    pub fn reset(&mut self) -> Result<String, JsValue> {
        self.game.reset(&mut self.log);
        let step = self.game.advance(&mut self.log);
        to_json(&self.log.frame(step))
    }

    /// Pose and target as JSON.
    pub fn state_json(&self) -> Result<String, JsValue> {
        to_json(self.game.world())
    }

    /// True while a run is in progress.
    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.game.is_running()
    }

    /// True while a play session is open.
    #[wasm_bindgen(getter)]
    pub fn playing(&self) -> bool {
        self.game.is_playing()
    }
}

impl Default for WasmTurtleGame {
    fn default() -> Self {
        Self::new()
    }
}

/// Three-LED panel.
#[wasm_bindgen]
#[derive(Debug)]
pub struct WasmLedPanel {
    runner: WasmRunner<LedBank>,
}

#[wasm_bindgen]
impl WasmLedPanel {
    /// Panel with every LED off.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();
        let config = SimConfig::for_kind(SimKind::Led);
        Self {
            runner: WasmRunner::new(Simulator::led(&config)),
        }
    }

    /// Start a run of `script`; blank scripts are ignored.
    pub fn run(&mut self, script: &str) -> bool {
        self.runner.run(script)
    }

    /// Advance the run; JSON `{ step, events }`.
    pub fn advance(&mut self) -> Result<String, JsValue> {
        self.runner.advance()
    }

    /// Cancel and turn every LED off.
    pub fn reset(&mut self) -> Result<String, JsValue> {
        self.runner.reset()
    }

    /// LED states as JSON.
    pub fn state_json(&self) -> Result<String, JsValue> {
        self.runner.state_json()
    }

    /// True while a run is in progress.
    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.runner.is_running()
    }
}

impl Default for WasmLedPanel {
    fn default() -> Self {
        Self::new()
    }
}
