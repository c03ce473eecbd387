//! Turtle on a square board.
//!
//! Heading is in degrees, 0 pointing up and increasing clockwise, with the
//! board's y axis growing downward. A move of `d` from heading `θ` goes to
//! `(x + cos(θ-90°)·d, y + sin(θ-90°)·d)`, so the home heading of 90°
//! points along +x.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SimConfig;
use crate::engine::{BoundsGuard, Effect, Verdict, World};
use crate::error::SimResult;
use crate::script::{Line, Script};

/// Turtle position and heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Column, 0 at the left edge.
    pub x: f64,
    /// Row, 0 at the top edge.
    pub y: f64,
    /// Degrees clockwise from up; not normalised.
    pub heading: f64,
}

impl Pose {
    /// Start pose: top-left cell, facing right.
    pub const HOME: Self = Self {
        x: 0.0,
        y: 0.0,
        heading: 90.0,
    };

    /// Heading folded into `[0, 360)` for display.
    #[must_use]
    pub fn heading_normalized(&self) -> f64 {
        self.heading.rem_euclid(360.0)
    }

    /// Displacement for a move of `distance` along the heading.
    #[must_use]
    pub fn displacement(&self, distance: f64) -> (f64, f64) {
        let radians = (self.heading - 90.0).to_radians();
        (radians.cos() * distance, radians.sin() * distance)
    }

    /// Euclidean distance to a board cell.
    #[must_use]
    pub fn distance_to(&self, square: Square) -> f64 {
        (self.x - f64::from(square.x)).hypot(self.y - f64::from(square.y))
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::HOME
    }
}

/// Integer board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl Square {
    /// Create a cell.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The start cell.
    pub const ORIGIN: Self = Self::new(0, 0);
}

/// Decoded turtle instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurtleCommand {
    /// `ANDA v`
    Forward(f64),
    /// `TRAS v` / `TRÁS v`
    Back(f64),
    /// `DIREITA v`
    Right(f64),
    /// `ESQUERDA v`
    Left(f64),
    /// Anything else.
    Noop,
}

impl TurtleCommand {
    /// Decode a line; a missing or unreadable operand reads as 0.
    #[must_use]
    pub fn from_line(line: &Line) -> Self {
        let value = line.number(1);
        match line.command() {
            Some("ANDA") => Self::Forward(value),
            Some("TRAS" | "TRÁS") => Self::Back(value),
            Some("DIREITA") => Self::Right(value),
            Some("ESQUERDA") => Self::Left(value),
            _ => Self::Noop,
        }
    }
}

/// Turtle world: pose, board guard and the optional game target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurtleWorld {
    pose: Pose,
    guard: BoundsGuard,
    target: Option<Square>,
    win_radius: f64,
}

impl TurtleWorld {
    /// Create a world at the home pose.
    #[must_use]
    pub const fn new(guard: BoundsGuard, win_radius: f64) -> Self {
        Self {
            pose: Pose::HOME,
            guard,
            target: None,
            win_radius,
        }
    }

    /// Build from configuration.
    #[must_use]
    pub const fn from_config(config: &SimConfig) -> Self {
        let guard = BoundsGuard::from_config(&config.board);
        Self::new(guard, config.game.win_radius)
    }

    /// Current pose.
    #[must_use]
    pub const fn pose(&self) -> Pose {
        self.pose
    }

    /// Board guard.
    #[must_use]
    pub const fn guard(&self) -> &BoundsGuard {
        &self.guard
    }

    /// Cells per side.
    #[must_use]
    pub const fn grid_size(&self) -> u32 {
        self.guard.grid_size()
    }

    /// Game target, present only while playing.
    #[must_use]
    pub const fn target(&self) -> Option<Square> {
        self.target
    }

    /// True while a play session is active.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.target.is_some()
    }

    /// Start or end a play session.
    pub fn set_target(&mut self, target: Option<Square>) {
        self.target = target;
    }

    /// Move `distance` along the heading.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SimError::InvalidMove`] and leaves the pose
    /// unchanged if the destination is off the board.
    pub fn move_by(&mut self, distance: f64) -> SimResult<Pose> {
        let (dx, dy) = self.pose.displacement(distance);
        let x = self.pose.x + dx;
        let y = self.pose.y + dy;
        self.guard.check(x, y)?;
        self.pose.x = x;
        self.pose.y = y;
        Ok(self.pose)
    }

    /// Turn clockwise by `degrees` (negative turns left).
    pub fn rotate(&mut self, degrees: f64) {
        self.pose.heading += degrees;
    }

    /// Back to the home pose; the target is kept.
    pub fn reset_pose(&mut self) {
        self.pose = Pose::HOME;
    }

    /// Judge the current pose against the target, if playing.
    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        self.target.map(|target| {
            if self.pose.distance_to(target) < self.win_radius {
                Verdict::Win
            } else {
                Verdict::Lose
            }
        })
    }

    fn glyph(&self) -> char {
        match self.pose.heading_normalized() {
            h if !(45.0..315.0).contains(&h) => '^',
            h if h < 135.0 => '>',
            h if h < 225.0 => 'v',
            _ => '<',
        }
    }
}

impl Default for TurtleWorld {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

impl World for TurtleWorld {
    type Command = TurtleCommand;

    fn decode(&self, line: &Line) -> TurtleCommand {
        TurtleCommand::from_line(line)
    }

    fn apply(&mut self, command: &TurtleCommand) -> SimResult<Effect> {
        match *command {
            TurtleCommand::Forward(distance) => self.move_by(distance).map(|_| Effect::Changed),
            TurtleCommand::Back(distance) => self.move_by(-distance).map(|_| Effect::Changed),
            TurtleCommand::Right(degrees) => {
                self.rotate(degrees);
                Ok(Effect::Changed)
            }
            TurtleCommand::Left(degrees) => {
                self.rotate(-degrees);
                Ok(Effect::Changed)
            }
            TurtleCommand::Noop => Ok(Effect::Idle),
        }
    }

    fn reset(&mut self) {
        self.reset_pose();
        self.target = None;
    }

    fn begin_run(&mut self, _script: &Script) -> bool {
        self.reset_pose();
        true
    }

    fn conclude(&mut self) -> Option<Verdict> {
        let verdict = self.verdict()?;
        self.target = None;
        self.reset_pose();
        Some(verdict)
    }
}

impl fmt::Display for TurtleWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let turtle = (self.pose.x.round(), self.pose.y.round());
        for row in 0..self.grid_size() {
            for col in 0..self.grid_size() {
                let cell = (f64::from(col), f64::from(row));
                let ch = if cell == turtle {
                    self.glyph()
                } else if self.target == Some(Square::new(col, row)) {
                    '@'
                } else {
                    '.'
                };
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "x={:.2} y={:.2} heading={:.0}°",
            self.pose.x,
            self.pose.y,
            self.pose.heading_normalized()
        )
    }
}
