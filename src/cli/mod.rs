//! CLI module for the pizza API
//!
//! Provides command-line interface for:
//! - serve: Load configuration and run the HTTP server
//! - check-config: Validate a configuration file

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, DEFAULT_CONFIG_PATH};
pub use commands::{check_config, run, run_command, serve, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
