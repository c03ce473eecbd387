//! Three-LED panel.
//!
//! State survives between runs; only [`World::reset`] turns the panel off.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::engine::{Effect, World};
use crate::error::SimResult;
use crate::script::{Line, Script};

/// Number of LEDs on the panel.
pub const LED_COUNT: usize = 3;

/// LED colour, by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedColor {
    /// LED 1.
    Yellow,
    /// LED 2.
    Green,
    /// LED 3.
    Red,
}

impl LedColor {
    /// All colours in id order.
    pub const ALL: [Self; LED_COUNT] = [Self::Yellow, Self::Green, Self::Red];

    /// Colour of a one-based LED id.
    #[must_use]
    pub fn from_id(id: i64) -> Option<Self> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Red => "red",
        }
    }
}

/// Decoded LED instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedCommand {
    /// `ACIONAR id 0|1` with readable operands.
    Switch {
        /// One-based LED id, not yet range checked.
        led: i64,
        /// Requested state.
        on: bool,
    },
    /// `ACIONAR` with unreadable operands or an action other than 0/1.
    Invalid,
    /// `ESPERAR s`; `None` when the operand is unreadable.
    Wait(Option<Duration>),
    /// `LIMPAR`
    Clear,
    /// Anything else.
    Noop,
}

impl LedCommand {
    /// Decode a line.
    #[must_use]
    pub fn from_line(line: &Line) -> Self {
        match line.command() {
            Some("ACIONAR") => match (line.integer(1), line.integer(2)) {
                (Some(led), Some(0)) => Self::Switch { led, on: false },
                (Some(led), Some(1)) => Self::Switch { led, on: true },
                _ => Self::Invalid,
            },
            Some("ESPERAR") => Self::Wait(line.float(1).and_then(wait_duration)),
            Some("LIMPAR") => Self::Clear,
            _ => Self::Noop,
        }
    }
}

/// Seconds to a pause; negative values wait zero.
fn wait_duration(seconds: f64) -> Option<Duration> {
    if seconds.is_nan() {
        return None;
    }
    Duration::try_from_secs_f64(seconds.max(0.0)).ok()
}

/// On/off state of the panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedBank {
    leds: [bool; LED_COUNT],
}

impl LedBank {
    /// All LEDs off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            leds: [false; LED_COUNT],
        }
    }

    /// Set a one-based LED. Returns `false` for an unknown id.
    pub fn set(&mut self, id: i64, on: bool) -> bool {
        let Some(slot) = Self::index(id).and_then(|i| self.leds.get_mut(i)) else {
            return false;
        };
        *slot = on;
        true
    }

    /// State of a one-based LED; unknown ids read as off.
    #[must_use]
    pub fn is_on(&self, id: i64) -> bool {
        Self::index(id)
            .and_then(|i| self.leds.get(i))
            .copied()
            .unwrap_or(false)
    }

    /// Turn every LED off.
    pub fn clear(&mut self) {
        self.leds = [false; LED_COUNT];
    }

    /// States in id order.
    #[must_use]
    pub const fn states(&self) -> [bool; LED_COUNT] {
        self.leds
    }

    /// Number of LEDs currently on.
    #[must_use]
    pub fn lit_count(&self) -> usize {
        self.leds.iter().filter(|on| **on).count()
    }

    fn index(id: i64) -> Option<usize> {
        LedColor::from_id(id).and_then(|_| usize::try_from(id - 1).ok())
    }
}

impl World for LedBank {
    type Command = LedCommand;

    fn decode(&self, line: &Line) -> LedCommand {
        LedCommand::from_line(line)
    }

    fn apply(&mut self, command: &LedCommand) -> SimResult<Effect> {
        let effect = match *command {
            LedCommand::Switch { led, on } => {
                if self.set(led, on) {
                    Effect::Changed
                } else {
                    log::debug!("no LED with id {led}");
                    Effect::Idle
                }
            }
            LedCommand::Clear => {
                self.clear();
                Effect::Changed
            }
            LedCommand::Wait(Some(duration)) => Effect::Wait(duration),
            LedCommand::Wait(None) | LedCommand::Invalid | LedCommand::Noop => Effect::Idle,
        };
        Ok(effect)
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn begin_run(&mut self, script: &Script) -> bool {
        !script.is_blank()
    }
}

impl fmt::Display for LedBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (color, on)) in LedColor::ALL.iter().zip(self.leds).enumerate() {
            if i > 0 {
                f.write_str("  ")?;
            }
            let lamp = if on { '●' } else { '○' };
            write!(f, "{} {lamp} {}", i + 1, color.name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_line(bank: &mut LedBank, text: &str) -> Effect {
        let command = bank.decode(&Line::parse(text));
        bank.apply(&command).expect("led commands never fail")
    }

    fn decode(text: &str) -> LedCommand {
        LedCommand::from_line(&Line::parse(text))
    }

    #[test]
    fn test_switch_on_and_off() {
        let mut bank = LedBank::new();
        assert_eq!(apply_line(&mut bank, "ACIONAR 2 1"), Effect::Changed);
        assert!(bank.is_on(2));
        assert_eq!(bank.states(), [false, true, false]);
        apply_line(&mut bank, "acionar 2 0");
        assert!(!bank.is_on(2));
    }

    #[test]
    fn test_unknown_led_is_noop() {
        let mut bank = LedBank::new();
        assert_eq!(apply_line(&mut bank, "ACIONAR 5 1"), Effect::Idle);
        assert_eq!(apply_line(&mut bank, "ACIONAR 0 1"), Effect::Idle);
        assert_eq!(apply_line(&mut bank, "ACIONAR -1 1"), Effect::Idle);
        assert_eq!(bank, LedBank::new());
    }

    #[test]
    fn test_invalid_operands() {
        assert_eq!(decode("ACIONAR 1 2"), LedCommand::Invalid);
        assert_eq!(decode("ACIONAR x 1"), LedCommand::Invalid);
        assert_eq!(decode("ACIONAR 1"), LedCommand::Invalid);
        let switch = LedCommand::Switch { led: 3, on: true };
        assert_eq!(decode("ACIONAR 3 1abc"), switch);
    }

    #[test]
    fn test_hex_operands() {
        let mut bank = LedBank::new();
        assert_eq!(apply_line(&mut bank, "ACIONAR 1 0x1"), Effect::Changed);
        assert!(bank.is_on(1));

        let off = LedCommand::Switch { led: 2, on: false };
        assert_eq!(decode("ACIONAR 0X2 0X0"), off);
        assert_eq!(decode("ACIONAR 1 0x"), LedCommand::Invalid);
    }

    #[test]
    fn test_clear_turns_everything_off() {
        let mut bank = LedBank::new();
        apply_line(&mut bank, "ACIONAR 1 1");
        apply_line(&mut bank, "ACIONAR 2 1");
        assert_eq!(bank.lit_count(), 2);
        assert_eq!(apply_line(&mut bank, "LIMPAR"), Effect::Changed);
        assert_eq!(bank.lit_count(), 0);
    }

    #[test]
    fn test_wait_overrides_pause() {
        let mut bank = LedBank::new();
        assert_eq!(
            apply_line(&mut bank, "ESPERAR 1.5"),
            Effect::Wait(Duration::from_millis(1500))
        );
        let negative = apply_line(&mut bank, "ESPERAR -2");
        assert_eq!(negative, Effect::Wait(Duration::ZERO));
        assert_eq!(apply_line(&mut bank, "ESPERAR"), Effect::Idle);
        assert_eq!(apply_line(&mut bank, "ESPERAR abc"), Effect::Idle);
    }

    #[test]
    fn test_unknown_command_is_idle() {
        let mut bank = LedBank::new();
        assert_eq!(apply_line(&mut bank, "PISCAR 1"), Effect::Idle);
    }

    #[test]
    fn test_blank_script_refused() {
        let mut bank = LedBank::new();
        assert!(!bank.begin_run(&Script::parse("  \n\n")));
        assert!(bank.begin_run(&Script::parse("\nLIMPAR")));
    }

    #[test]
    fn test_begin_run_keeps_state() {
        let mut bank = LedBank::new();
        bank.set(3, true);
        assert!(bank.begin_run(&Script::parse("ESPERAR 1")));
        assert!(bank.is_on(3));
        bank.reset();
        assert!(!bank.is_on(3));
    }

    #[test]
    fn test_colors() {
        assert_eq!(LedColor::from_id(1), Some(LedColor::Yellow));
        assert_eq!(LedColor::from_id(3), Some(LedColor::Red));
        assert_eq!(LedColor::from_id(4), None);
        assert_eq!(LedColor::from_id(0), None);
    }

    #[test]
    fn test_display() {
        let mut bank = LedBank::new();
        bank.set(1, true);
        assert_eq!(bank.to_string(), "1 ● yellow  2 ○ green  3 ○ red");
    }
}
