//! CLI output formatting.
//!
//! Formatting lives in `format_*` functions returning strings so it can be
//! tested; the `print_*` wrappers write to stdout.

use std::fmt::Write as _;

use crate::config::SimConfig;
use crate::engine::RunOutcome;

use super::commands::CheckReport;

/// Version line, with the git hash when the build recorded one.
#[must_use]
pub fn format_version() -> String {
    let version = option_env!("CODESTEP_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    match option_env!("CODESTEP_GIT_HASH") {
        Some(hash) if !hash.is_empty() && hash != "unknown" => {
            format!("codestep {version} ({hash})")
        }
        _ => format!("codestep {version}"),
    }
}

/// Print version information.
pub fn print_version() {
    println!("{}", format_version());
}

/// Print help message.
pub fn print_help() {
    println!(
        r"codestep - step-by-step script simulators for the classroom

USAGE:
    codestep <COMMAND> [OPTIONS]

COMMANDS:
    run <script.txt>            Run a script
        --sim <turtle|game|led> Simulator to run (default: from config, else turtle)
        --config <file.yaml>    Load configuration
        --seed <N>              Override the apple placement seed
        --speed <X>             Pacing multiplier (2 = twice as fast)
        --instant               Skip every pause
        -v, --verbose           Enable verbose output

    check <script.txt>          Decode a script without running it
        --sim <turtle|game|led> Instruction set (default: turtle)

    help                        Show this help message
    version                     Show version information

INSTRUCTIONS:
    turtle, game   ANDA n | TRAS n | DIREITA graus | ESQUERDA graus
    led            ACIONAR led 0|1 | ESPERAR segundos | LIMPAR

EXIT STATUS:
    0  run completed or game won
    1  a line aborted the run, or the command failed
    2  game lost

EXAMPLES:
    codestep run caminho.txt
    codestep run maca.txt --sim game --seed 7
    codestep run semaforo.txt --sim led --speed 4
    RUST_LOG=debug codestep run caminho.txt --instant
"
    );
}

/// One-line summary of a finished run.
#[must_use]
pub fn format_outcome(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Completed => "✓ Run completed".to_string(),
        RunOutcome::Won => "✓ Game won".to_string(),
        RunOutcome::Lost => "✗ Game lost".to_string(),
        RunOutcome::Aborted { line } => format!("✗ Run aborted at line {}", line + 1),
        RunOutcome::Cancelled => "✗ Run cancelled".to_string(),
    }
}

/// Print the run summary.
pub fn print_outcome(outcome: &RunOutcome) {
    println!("{}", format_outcome(outcome));
}

/// Configuration summary shown with `--verbose`.
#[must_use]
pub fn format_config(config: &SimConfig) -> String {
    let pacing = config.pacing();
    let mut out = String::new();
    let _ = writeln!(out, "Simulator: {}", config.kind.name());
    let _ = writeln!(
        out,
        "Board:     {0}×{0} (ε = {1})",
        config.board.grid_size, config.board.epsilon
    );
    let _ = writeln!(out, "Seed:      {}", config.seed);
    let _ = write!(
        out,
        "Pacing:    settle {}ms, blank {}ms, idle {}ms, effect {}ms, error {}ms, tail {}ms",
        pacing.settle_ms,
        pacing.blank_ms,
        pacing.idle_ms,
        pacing.effect_ms,
        pacing.error_ms,
        pacing.tail_ms
    );
    out
}

/// Print the configuration summary.
pub fn print_config(config: &SimConfig) {
    println!("{}", format_config(config));
    println!();
}

/// Line-by-line listing produced by `check`.
#[must_use]
pub fn format_check_report(report: &CheckReport) -> String {
    let mut out = String::new();
    for entry in &report.entries {
        let marker = if entry.recognized { ' ' } else { '?' };
        let _ = writeln!(
            out,
            "{marker} {:>3} │ {:<24} {}",
            entry.line + 1,
            entry.source,
            entry.decoded
        );
    }
    let unknown = report.unrecognized_count();
    if unknown == 0 {
        let _ = write!(out, "✓ {} lines, all recognized", report.entries.len());
    } else {
        let _ = write!(
            out,
            "? {} lines, {unknown} will do nothing",
            report.entries.len()
        );
    }
    out
}

/// Print a check report.
pub fn print_check_report(report: &CheckReport) {
    println!("{}", format_check_report(report));
}
