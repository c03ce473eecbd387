//! CLI module for codestep.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested.
//! The entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, RunOptions};
pub use commands::{
    check_script, exit_status, resolve_config, run_cli, run_script, simulate, CheckEntry,
    CheckReport,
};
pub use output::{
    format_check_report, format_config, format_outcome, format_version, print_help, print_version,
};
