//! CLI argument definitions using clap
//!
//! Commands:
//! - pizza-api serve [--config <path>] [--port <port>]
//! - pizza-api check-config --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Configuration file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "./pizza-api.json";

/// Pizza API - a REST service over a document collection of pizzas
#[derive(Parser, Debug)]
#[command(name = "pizza-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file; `./pizza-api.json` is read if present
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on, overriding the configuration file
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load and validate a configuration file, then exit
    CheckConfig {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
