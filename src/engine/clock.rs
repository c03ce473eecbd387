//! Pacing clocks.
//!
//! The stepper never sleeps. It hands each pacing delay back to its driver,
//! and a [`Pacer`] decides what a delay means:
//! - [`ThreadPacer`] sleeps the current thread (optionally scaled)
//! - [`VirtualClock`] only records the delay, for tests and instant runs

use std::time::Duration;

/// Consumes pacing delays yielded by the stepper.
pub trait Pacer {
    /// Suspend for `duration`.
    fn pause(&mut self, duration: Duration);
}

/// Sleeps the calling thread.
#[derive(Debug, Clone, Copy)]
pub struct ThreadPacer {
    /// Multiplier applied to every delay; `0.5` plays twice as fast.
    speed_scale: f64,
}

impl ThreadPacer {
    /// Real-time pacer.
    #[must_use]
    pub const fn new() -> Self {
        Self { speed_scale: 1.0 }
    }

    /// Pacer that plays `speed` times faster than real time.
    ///
    /// Non-positive or non-finite speeds fall back to real time.
    #[must_use]
    pub fn with_speed(speed: f64) -> Self {
        let speed_scale = if speed.is_finite() && speed > 0.0 {
            1.0 / speed
        } else {
            1.0
        };
        Self { speed_scale }
    }

    /// Delay actually slept for a requested `duration`.
    ///
    /// Saturates at [`Duration::MAX`] instead of overflowing.
    #[must_use]
    pub fn scaled(&self, duration: Duration) -> Duration {
        Duration::try_from_secs_f64(duration.as_secs_f64() * self.speed_scale)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for ThreadPacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        let scaled = self.scaled(duration);
        if !scaled.is_zero() {
            std::thread::sleep(scaled);
        }
    }
}

/// Virtual clock: advances instantly and remembers every pause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualClock {
    elapsed: Duration,
    pauses: Vec<Duration>,
}

impl VirtualClock {
    /// Create a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total virtual time elapsed.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Every pause in order.
    #[must_use]
    pub fn pauses(&self) -> &[Duration] {
        &self.pauses
    }

    /// Number of pauses taken.
    #[must_use]
    pub fn pause_count(&self) -> usize {
        self.pauses.len()
    }

    /// Reset clock to zero.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.pauses.clear();
    }
}

impl Pacer for VirtualClock {
    fn pause(&mut self, duration: Duration) {
        self.elapsed = self.elapsed.saturating_add(duration);
        self.pauses.push(duration);
    }
}
