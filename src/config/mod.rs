//! Configuration system with YAML schema and validation.
//!
//! Every knob has a default that reproduces the classroom simulators, so an
//! empty document (or [`SimConfig::default`]) is a valid configuration.
//! Mistakes are caught in two passes: `validator` range checks on each
//! section, then [`SimConfig::validate_semantic`] for cross-field rules.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use validator::Validate;

use crate::error::{SimError, SimResult};

/// Which simulator a configuration describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimKind {
    /// Free-roaming turtle on the board.
    #[default]
    Turtle,
    /// Turtle with the apple-collection game.
    Game,
    /// Three-LED panel.
    Led,
}

impl SimKind {
    /// Parse a kind name as used on the command line.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "turtle" | "tartaruga" => Some(Self::Turtle),
            "game" | "jogo" => Some(Self::Game),
            "led" | "leds" => Some(Self::Led),
            _ => None,
        }
    }

    /// Canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Turtle => "turtle",
            Self::Game => "game",
            Self::Led => "led",
        }
    }
}

/// Top-level simulator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Simulator kind.
    #[serde(default)]
    pub kind: SimKind,

    /// Seed for target placement.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Board geometry.
    #[validate(nested)]
    #[serde(default)]
    pub board: BoardConfig,

    /// Game rules.
    #[validate(nested)]
    #[serde(default)]
    pub game: GameConfig,

    /// Pacing override; the kind's profile applies when absent.
    #[serde(default)]
    pub pacing: Option<PacingConfig>,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

const fn default_seed() -> u64 {
    42
}

impl SimConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SimResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        config.validate_semantic()?;
        Ok(config)
    }

    /// Default configuration for `kind`.
    #[must_use]
    pub fn for_kind(kind: SimKind) -> Self {
        Self::builder().kind(kind).build()
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> SimConfigBuilder {
        SimConfigBuilder::default()
    }

    /// Validate constraints that span several fields.
    ///
    /// # Errors
    ///
    /// Returns error if the pacing section is out of range or the win
    /// radius cannot fit on the board.
    pub fn validate_semantic(&self) -> SimResult<()> {
        if let Some(pacing) = &self.pacing {
            pacing.validate()?;
        }

        if self.game.win_radius > f64::from(self.board.grid_size) {
            return Err(SimError::config(format!(
                "win radius {} exceeds board size {}",
                self.game.win_radius, self.board.grid_size
            )));
        }

        Ok(())
    }

    /// Effective pacing: the override if present, else the kind's profile.
    #[must_use]
    pub fn pacing(&self) -> PacingConfig {
        self.pacing
            .clone()
            .unwrap_or_else(|| PacingConfig::for_kind(self.kind))
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            kind: SimKind::default(),
            seed: default_seed(),
            board: BoardConfig::default(),
            game: GameConfig::default(),
            pacing: None,
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct SimConfigBuilder {
    kind: Option<SimKind>,
    seed: Option<u64>,
    grid_size: Option<u32>,
    pacing: Option<PacingConfig>,
}

impl SimConfigBuilder {
    /// Set the simulator kind.
    #[must_use]
    pub const fn kind(mut self, kind: SimKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the board size in cells per side.
    #[must_use]
    pub const fn grid_size(mut self, size: u32) -> Self {
        self.grid_size = Some(size);
        self
    }

    /// Override pacing.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = Some(pacing);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> SimConfig {
        let mut config = SimConfig::default();

        if let Some(kind) = self.kind {
            config.kind = kind;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(size) = self.grid_size {
            config.board.grid_size = size;
        }
        config.pacing = self.pacing;

        config
    }
}

/// Board geometry.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BoardConfig {
    /// Cells per side.
    #[validate(range(min = 2, max = 64))]
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,
    /// Tolerance applied to the bounds check.
    #[validate(range(min = 0.0, max = 0.5))]
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

const fn default_grid_size() -> u32 {
    8
}

const fn default_epsilon() -> f64 {
    0.001
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            epsilon: default_epsilon(),
        }
    }
}

/// Game rules.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GameConfig {
    /// Distance below which the turtle has reached the apple.
    #[validate(range(min = 0.0))]
    #[serde(default = "default_win_radius")]
    pub win_radius: f64,
}

const fn default_win_radius() -> f64 {
    0.5
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            win_radius: default_win_radius(),
        }
    }
}

/// Pacing delays in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PacingConfig {
    /// Pause after the run-start render, before line 0.
    #[validate(range(max = 60_000))]
    pub settle_ms: u64,
    /// Pause on a blank line.
    #[validate(range(max = 60_000))]
    pub blank_ms: u64,
    /// Pause on a line that changed nothing.
    #[validate(range(max = 60_000))]
    pub idle_ms: u64,
    /// Pause on a line that changed the world.
    #[validate(range(max = 60_000))]
    pub effect_ms: u64,
    /// Pause on the line that failed.
    #[validate(range(max = 60_000))]
    pub error_ms: u64,
    /// Pause after the last line, before the run concludes.
    #[validate(range(max = 60_000))]
    pub tail_ms: u64,
}

impl PacingConfig {
    /// Free-roaming turtle profile.
    #[must_use]
    pub const fn turtle() -> Self {
        Self {
            settle_ms: 500,
            blank_ms: 100,
            idle_ms: 200,
            effect_ms: 600,
            error_ms: 1000,
            tail_ms: 1000,
        }
    }

    /// Apple game profile.
    #[must_use]
    pub const fn game() -> Self {
        Self {
            tail_ms: 500,
            ..Self::turtle()
        }
    }

    /// LED panel profile: every non-blank line waits the same.
    #[must_use]
    pub const fn led() -> Self {
        Self {
            settle_ms: 0,
            blank_ms: 100,
            idle_ms: 500,
            effect_ms: 500,
            error_ms: 1000,
            tail_ms: 0,
        }
    }

    /// All delays zero.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            settle_ms: 0,
            blank_ms: 0,
            idle_ms: 0,
            effect_ms: 0,
            error_ms: 0,
            tail_ms: 0,
        }
    }

    /// Profile for `kind`.
    #[must_use]
    pub const fn for_kind(kind: SimKind) -> Self {
        match kind {
            SimKind::Turtle => Self::turtle(),
            SimKind::Game => Self::game(),
            SimKind::Led => Self::led(),
        }
    }

    /// Settle delay.
    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Blank-line delay.
    #[must_use]
    pub const fn blank(&self) -> Duration {
        Duration::from_millis(self.blank_ms)
    }

    /// No-effect delay.
    #[must_use]
    pub const fn idle(&self) -> Duration {
        Duration::from_millis(self.idle_ms)
    }

    /// Effect delay.
    #[must_use]
    pub const fn effect(&self) -> Duration {
        Duration::from_millis(self.effect_ms)
    }

    /// Error delay.
    #[must_use]
    pub const fn error(&self) -> Duration {
        Duration::from_millis(self.error_ms)
    }

    /// Tail delay.
    #[must_use]
    pub const fn tail(&self) -> Duration {
        Duration::from_millis(self.tail_ms)
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self::turtle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.validate_semantic().is_ok());
        assert_eq!(config.board.grid_size, 8);
        assert!((config.board.epsilon - 0.001).abs() < f64::EPSILON);
        assert!((config.game.win_radius - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = SimConfig::from_yaml("{}").expect("empty mapping is valid");
        assert_eq!(config.kind, SimKind::Turtle);
        assert_eq!(config.seed, 42);
        assert_eq!(config.pacing(), PacingConfig::turtle());
    }

    #[test]
    fn test_yaml_full_document() {
        let yaml = r"
schema_version: '1.0'
kind: led
seed: 7
board:
  grid_size: 10
  epsilon: 0.01
game:
  win_radius: 0.25
pacing:
  settle_ms: 0
  blank_ms: 10
  idle_ms: 20
  effect_ms: 30
  error_ms: 40
  tail_ms: 50
";
        let config = SimConfig::from_yaml(yaml).expect("valid config");
        assert_eq!(config.kind, SimKind::Led);
        assert_eq!(config.seed, 7);
        assert_eq!(config.board.grid_size, 10);
        assert_eq!(config.pacing().effect(), Duration::from_millis(30));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = SimConfig::from_yaml("colour: blue\n");
        assert!(matches!(result, Err(SimError::YamlParse(_))));
    }

    #[test]
    fn test_grid_too_small_rejected() {
        let result = SimConfig::from_yaml("board:\n  grid_size: 1\n");
        assert!(matches!(result, Err(SimError::Validation(_))));
    }

    #[test]
    fn test_pacing_out_of_range_rejected() {
        let yaml = r"
pacing:
  settle_ms: 0
  blank_ms: 0
  idle_ms: 0
  effect_ms: 999999
  error_ms: 0
  tail_ms: 0
";
        let result = SimConfig::from_yaml(yaml);
        assert!(matches!(result, Err(SimError::Validation(_))));
    }

    #[test]
    fn test_win_radius_larger_than_board_rejected() {
        let yaml = "board:\n  grid_size: 2\ngame:\n  win_radius: 3.0\n";
        let result = SimConfig::from_yaml(yaml);
        assert!(matches!(result, Err(SimError::Config { .. })));
    }

    #[test]
    fn test_builder() {
        let config = SimConfig::builder()
            .kind(SimKind::Game)
            .seed(99)
            .grid_size(12)
            .build();
        assert_eq!(config.kind, SimKind::Game);
        assert_eq!(config.seed, 99);
        assert_eq!(config.board.grid_size, 12);
        assert_eq!(config.pacing(), PacingConfig::game());
    }

    #[test]
    fn test_builder_pacing_override() {
        let config = SimConfig::builder()
            .kind(SimKind::Led)
            .pacing(PacingConfig::instant())
            .build();
        assert_eq!(config.pacing(), PacingConfig::instant());
    }

    #[test]
    fn test_kind_profiles() {
        assert_eq!(PacingConfig::for_kind(SimKind::Turtle).tail_ms, 1000);
        assert_eq!(PacingConfig::for_kind(SimKind::Game).tail_ms, 500);
        assert_eq!(PacingConfig::for_kind(SimKind::Led).settle_ms, 0);
        assert_eq!(PacingConfig::led().idle(), PacingConfig::led().effect());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(SimKind::from_name("LED"), Some(SimKind::Led));
        assert_eq!(SimKind::from_name("jogo"), Some(SimKind::Game));
        assert_eq!(SimKind::from_name("tartaruga"), Some(SimKind::Turtle));
        assert_eq!(SimKind::from_name("robot"), None);
        assert_eq!(SimKind::Game.name(), "game");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sim.yaml");
        std::fs::write(&path, "kind: game\nseed: 3\n").expect("write");
        let config = SimConfig::load(&path).expect("load");
        assert_eq!(config.kind, SimKind::Game);
        assert_eq!(config.seed, 3);
    }

    #[test]
    fn test_load_missing_file() {
        let result = SimConfig::load("/nonexistent/codestep.yaml");
        assert!(matches!(result, Err(SimError::Io(_))));
    }
}
