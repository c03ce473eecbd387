//! Board bounds guard.
//!
//! Stop-on-violation check run before every turtle move commits. A move
//! whose candidate position leaves the board is rejected outright; the
//! pose is never clamped back inside.

use serde::{Deserialize, Serialize};

use crate::config::BoardConfig;
use crate::error::{SimError, SimResult};

/// Checks candidate positions against `[-ε, size-1+ε]` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsGuard {
    grid_size: u32,
    epsilon: f64,
}

impl BoundsGuard {
    /// Create a guard for a `grid_size` × `grid_size` board.
    #[must_use]
    pub const fn new(grid_size: u32, epsilon: f64) -> Self {
        Self { grid_size, epsilon }
    }

    /// Build from board configuration.
    #[must_use]
    pub const fn from_config(board: &BoardConfig) -> Self {
        Self::new(board.grid_size, board.epsilon)
    }

    /// Cells per side.
    #[must_use]
    pub const fn grid_size(&self) -> u32 {
        self.grid_size
    }

    /// Tolerance.
    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Largest cell coordinate.
    #[must_use]
    pub fn max_coordinate(&self) -> f64 {
        f64::from(self.grid_size.saturating_sub(1))
    }

    /// True if `value` lies within the tolerant axis range.
    #[must_use]
    pub fn axis_contains(&self, value: f64) -> bool {
        value >= -self.epsilon && value <= self.max_coordinate() + self.epsilon
    }

    /// Check a candidate position.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidMove`] if either coordinate is outside
    /// the board, including NaN coordinates.
    pub fn check(&self, x: f64, y: f64) -> SimResult<()> {
        if self.axis_contains(x) && self.axis_contains(y) {
            Ok(())
        } else {
            Err(SimError::InvalidMove { x, y })
        }
    }
}

impl Default for BoundsGuard {
    fn default() -> Self {
        Self::from_config(&BoardConfig::default())
    }
}
