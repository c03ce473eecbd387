//! CLI command handlers.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use crate::config::{SimConfig, SimKind};
use crate::engine::{Pacer, RunOutcome, Simulator, ThreadPacer, VirtualClock, World};
use crate::error::SimResult;
use crate::renderers::TerminalView;
use crate::script::Script;
use crate::simulators::{LedBank, LedCommand, TurtleCommand, TurtleGame, TurtleWorld};

use super::args::RunOptions;
use super::output::{print_check_report, print_config, print_help, print_outcome, print_version};
use super::{Args, Command};

/// Exit status for a lost game.
const EXIT_LOST: u8 = 2;

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Run(options) => run_script(&options),
        Command::Check { script_path, sim } => check_script(&script_path, sim),
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Exit status for a run: 0 completed or won, 2 lost, 1 otherwise.
#[must_use]
pub fn exit_status(outcome: Option<RunOutcome>) -> u8 {
    match outcome {
        None | Some(RunOutcome::Completed | RunOutcome::Won) => 0,
        Some(RunOutcome::Lost) => EXIT_LOST,
        Some(RunOutcome::Aborted { .. } | RunOutcome::Cancelled) => 1,
    }
}

/// Resolve the configuration for a run: file or kind defaults, then the
/// command-line overrides.
///
/// # Errors
///
/// Returns error if the configuration file cannot be loaded.
pub fn resolve_config(options: &RunOptions) -> SimResult<SimConfig> {
    let mut config = match &options.config_path {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::for_kind(options.sim.unwrap_or_default()),
    };
    if let Some(kind) = options.sim {
        config.kind = kind;
    }
    if let Some(seed) = options.seed_override {
        config.seed = seed;
    }
    Ok(config)
}

/// Run a script file with a terminal view.
#[must_use]
pub fn run_script(options: &RunOptions) -> ExitCode {
    let config = match resolve_config(options) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    let text = match std::fs::read_to_string(&options.script_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("✗ Error reading {}: {e}", options.script_path.display());
            return ExitCode::from(1);
        }
    };

    if options.verbose {
        print_config(&config);
    }

    let outcome = if options.instant {
        simulate(&config, &text, std::io::stdout(), &mut VirtualClock::new()).0
    } else {
        let mut pacer = ThreadPacer::with_speed(options.speed);
        simulate(&config, &text, std::io::stdout(), &mut pacer).0
    };

    match &outcome {
        Some(outcome) => print_outcome(outcome),
        None => println!("Nothing to run."),
    }
    ExitCode::from(exit_status(outcome))
}

/// Run `text` on the simulator `config` names, drawing to `out`.
///
/// Returns the outcome (`None` if the run was refused) and the writer.
pub fn simulate<O: Write, P: Pacer>(
    config: &SimConfig,
    text: &str,
    out: O,
    pacer: &mut P,
) -> (Option<RunOutcome>, O) {
    let mut view = TerminalView::new(out);
    view.load_script(&Script::parse(text));

    let outcome = match config.kind {
        SimKind::Turtle => Simulator::turtle(config).run_blocking(text, &mut view, pacer),
        SimKind::Game => {
            let mut game = TurtleGame::new(config);
            game.play(&mut view);
            game.run_blocking(text, &mut view, pacer)
        }
        SimKind::Led => Simulator::led(config).run_blocking(text, &mut view, pacer),
    };
    (outcome, view.into_inner())
}

/// One decoded line in a check report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckEntry {
    /// Zero-based line index.
    pub line: usize,
    /// Trimmed source text.
    pub source: String,
    /// Debug rendering of the decoded command.
    pub decoded: String,
    /// False if the line will do nothing when run.
    pub recognized: bool,
}

/// Every non-blank line of a script, decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Entries in source order.
    pub entries: Vec<CheckEntry>,
}

impl CheckReport {
    /// Decode `script` against `kind`'s instruction set.
    #[must_use]
    pub fn build(kind: SimKind, script: &Script) -> Self {
        match kind {
            SimKind::Turtle | SimKind::Game => {
                Self::decode_with(&TurtleWorld::default(), script, |c| {
                    !matches!(c, TurtleCommand::Noop)
                })
            }
            SimKind::Led => Self::decode_with(&LedBank::new(), script, |c| {
                !matches!(c, LedCommand::Noop | LedCommand::Invalid)
            }),
        }
    }

    fn decode_with<W: World>(
        world: &W,
        script: &Script,
        recognized: impl Fn(&W::Command) -> bool,
    ) -> Self {
        let entries = script
            .lines()
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.is_blank())
            .map(|(index, line)| {
                let command = world.decode(line);
                CheckEntry {
                    line: index,
                    source: line.source().to_string(),
                    decoded: format!("{command:?}"),
                    recognized: recognized(&command),
                }
            })
            .collect();
        Self { entries }
    }

    /// Lines that will do nothing when run.
    #[must_use]
    pub fn unrecognized_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.recognized).count()
    }
}

/// Decode a script file and list what each line will do.
#[must_use]
pub fn check_script(path: &Path, kind: SimKind) -> ExitCode {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("✗ Error reading {}: {e}", path.display());
            return ExitCode::from(1);
        }
    };

    println!("Checking {} as {}\n", path.display(), kind.name());
    print_check_report(&CheckReport::build(kind, &Script::parse(&text)));
    ExitCode::SUCCESS
}
