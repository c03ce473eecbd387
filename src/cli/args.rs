//! CLI argument parsing.
//!
//! Hand-rolled so it can be driven from any iterator of strings in tests.

use std::path::PathBuf;

use crate::config::SimKind;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Options for `run`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Path to the script file.
    pub script_path: PathBuf,
    /// Simulator override; the config's kind applies otherwise.
    pub sim: Option<SimKind>,
    /// Optional YAML configuration file.
    pub config_path: Option<PathBuf>,
    /// Optional seed override.
    pub seed_override: Option<u64>,
    /// Pacing multiplier: 2.0 runs twice as fast.
    pub speed: f64,
    /// Skip every pause.
    pub instant: bool,
    /// Enable verbose output.
    pub verbose: bool,
}

impl RunOptions {
    /// Defaults for `script_path`.
    #[must_use]
    pub fn new(script_path: impl Into<PathBuf>) -> Self {
        Self {
            script_path: script_path.into(),
            sim: None,
            config_path: None,
            seed_override: None,
            speed: 1.0,
            instant: false,
            verbose: false,
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run a script with pacing and a terminal view.
    Run(RunOptions),
    /// Decode a script without running it.
    Check {
        /// Path to the script file.
        script_path: PathBuf,
        /// Instruction set to decode with.
        sim: SimKind,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// This method is testable as it accepts any iterator of strings,
    /// not just `std::env::args()`.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        let Some(name) = args.get(1) else {
            return Self {
                command: Command::Help,
            };
        };

        let command = match name.as_str() {
            "run" => Self::parse_run_command(args),
            "check" => Self::parse_check_command(args),
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    fn parse_run_command(args: &[String]) -> Command {
        let Some(path) = args.get(2) else {
            eprintln!("Error: 'run' command requires a script path");
            return Command::Help;
        };

        let mut options = RunOptions::new(path);
        let mut i = 3;
        while i < args.len() {
            let value = args.get(i + 1);
            match args[i].as_str() {
                "--sim" => {
                    options.sim = value.and_then(|v| parse_kind(v));
                    i += 2;
                }
                "--config" => {
                    options.config_path = value.map(PathBuf::from);
                    i += 2;
                }
                "--seed" => {
                    options.seed_override = value.and_then(|v| v.parse().ok());
                    i += 2;
                }
                "--speed" => {
                    if let Some(speed) = value
                        .and_then(|v| v.parse::<f64>().ok())
                        .filter(|s| s.is_finite() && *s > 0.0)
                    {
                        options.speed = speed;
                    } else {
                        eprintln!("Warning: --speed expects a positive number");
                    }
                    i += 2;
                }
                "--instant" => {
                    options.instant = true;
                    i += 1;
                }
                "-v" | "--verbose" => {
                    options.verbose = true;
                    i += 1;
                }
                _ => i += 1,
            }
        }

        Command::Run(options)
    }

    fn parse_check_command(args: &[String]) -> Command {
        let Some(path) = args.get(2) else {
            eprintln!("Error: 'check' command requires a script path");
            return Command::Help;
        };

        let mut sim = SimKind::default();
        if args.get(3).map(String::as_str) == Some("--sim") {
            if let Some(kind) = args.get(4).and_then(|v| parse_kind(v)) {
                sim = kind;
            }
        }

        Command::Check {
            script_path: PathBuf::from(path),
            sim,
        }
    }
}

fn parse_kind(name: &str) -> Option<SimKind> {
    let kind = SimKind::from_name(name);
    if kind.is_none() {
        eprintln!("Warning: unknown simulator '{name}' (expected turtle, game or led)");
    }
    kind
}
