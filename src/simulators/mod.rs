//! The three classroom simulators.
//!
//! - [`turtle`]: grid mover driven by `ANDA`/`TRAS`/`DIREITA`/`ESQUERDA`
//! - [`game`]: the turtle with an apple to reach
//! - [`led`]: three LEDs driven by `ACIONAR`/`ESPERAR`/`LIMPAR`

pub mod game;
pub mod led;
pub mod turtle;

pub use game::TurtleGame;
pub use led::{LedBank, LedColor, LedCommand};
pub use turtle::{Pose, Square, TurtleCommand, TurtleWorld};

use crate::config::SimConfig;
use crate::engine::Simulator;

/// Free-roaming turtle simulator.
pub type TurtleSimulator = Simulator<TurtleWorld>;

/// LED panel simulator.
pub type LedSimulator = Simulator<LedBank>;

impl Simulator<TurtleWorld> {
    /// Turtle simulator from configuration.
    #[must_use]
    pub fn turtle(config: &SimConfig) -> Self {
        Self::new(TurtleWorld::from_config(config), config.pacing())
    }
}

impl Simulator<LedBank> {
    /// LED simulator from configuration.
    #[must_use]
    pub fn led(config: &SimConfig) -> Self {
        Self::new(LedBank::new(), config.pacing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PacingConfig, SimKind};
    use crate::engine::{RunOutcome, VirtualClock};
    use crate::renderers::EventLog;
    use std::time::Duration;

    #[test]
    fn test_turtle_from_config() {
        let config = SimConfig::builder().grid_size(4).build();
        let sim = TurtleSimulator::turtle(&config);
        assert_eq!(sim.world().grid_size(), 4);
        assert_eq!(sim.pacing(), &PacingConfig::turtle());
    }

    #[test]
    fn test_led_run_paced_by_wait() {
        let mut sim = LedSimulator::led(&SimConfig::for_kind(SimKind::Led));
        let mut log: EventLog<LedBank> = EventLog::new();
        let mut clock = VirtualClock::new();

        let outcome = sim.run_blocking("ACIONAR 1 1\nESPERAR 2\nACIONAR 9 1", &mut log, &mut clock);
        assert_eq!(outcome, Some(RunOutcome::Completed));
        assert_eq!(
            clock.pauses(),
            &[
                Duration::from_millis(500),
                Duration::from_secs(2),
                Duration::from_millis(500)
            ]
        );
        assert!(sim.world().is_on(1));
    }

    #[test]
    fn test_led_state_persists_across_runs() {
        let mut sim = LedSimulator::led(&SimConfig::for_kind(SimKind::Led));
        let mut log: EventLog<LedBank> = EventLog::new();
        let mut clock = VirtualClock::new();

        sim.run_blocking("ACIONAR 3 1", &mut log, &mut clock);
        sim.run_blocking("ACIONAR 1 1", &mut log, &mut clock);
        assert_eq!(sim.world().states(), [true, false, true]);
    }

    #[test]
    fn test_blank_led_script_ignored() {
        let mut sim = LedSimulator::led(&SimConfig::for_kind(SimKind::Led));
        let mut log: EventLog<LedBank> = EventLog::new();
        let outcome = sim.run_blocking("\n  \n", &mut log, &mut VirtualClock::new());
        assert_eq!(outcome, None);
        assert!(log.events().is_empty());
    }
}
