//! codestep CLI
//!
//! Runs classroom scripts in the terminal.
//!
//! Set `RUST_LOG=debug` to trace every step.

use std::process::ExitCode;

use codestep::cli::{run_cli, Args};

fn main() -> ExitCode {
    pretty_env_logger::init();
    run_cli(Args::parse())
}
