//! CLI module for pie-api
//!
//! Provides command-line interface for:
//! - serve: Load configuration and run the HTTP service
//! - init: Write a default configuration file

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, resolve_config, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}
