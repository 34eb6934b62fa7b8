//! CLI command implementations
//!
//! `serve` loads configuration, builds the in-memory store and the pizza
//! repository, then runs the HTTP server until Ctrl-C. `check-config`
//! only loads and validates.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::{log_event, log_event_with_fields, Event};
use crate::pizza;
use crate::rest_api::{HttpServer, HttpServerConfig};
use crate::store::{IdFormat, MemoryStore};

use super::args::{Command, DEFAULT_CONFIG_PATH};
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Listener settings
    #[serde(flatten)]
    pub server: HttpServerConfig,

    /// Id format of the store (default: object_id)
    #[serde(default)]
    pub id_format: IdFormat,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config '{}': {}", path.display(), e))
        })?;

        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        self.server.validate().map_err(CliError::config_error)
    }
}

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Resolve the effective configuration for `serve`.
///
/// Without `--config`, `default_path` is loaded when it exists and
/// built-in defaults apply otherwise.
fn resolve_config(
    config_path: Option<&Path>,
    default_path: &Path,
    port: Option<u16>,
) -> CliResult<Config> {
    let mut config = match config_path {
        Some(path) => Config::load(path)?,
        None if default_path.is_file() => Config::load(default_path)?,
        None => Config::default(),
    };

    if let Some(port) = port {
        config.server.port = port;
        config.validate()?;
    }

    Ok(config)
}

/// Start the HTTP server
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    log_event(Event::ServerStart);

    let config = match resolve_config(config_path, Path::new(DEFAULT_CONFIG_PATH), port) {
        Ok(config) => config,
        Err(e) => {
            log_event_with_fields(Event::StartupFailed, &[("error", e.message())]);
            return Err(e);
        }
    };

    let port = config.server.port.to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("host", config.server.host.as_str()),
            ("id_format", config.id_format.as_str()),
            ("port", port.as_str()),
        ],
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::startup_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let store = MemoryStore::new(config.id_format);
        let repository = pizza::repository(&store).await;
        let server = HttpServer::new(config.server, repository);

        server.start().await.map_err(|e| {
            let message = format!("HTTP server failed: {}", e);
            log_event_with_fields(Event::StartupFailed, &[("error", message.as_str())]);
            CliError::startup_failed(message)
        })
    })
}

/// Load and validate a configuration file
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    println!(
        "Configuration OK: {} (id_format: {})",
        config.server.socket_addr(),
        config.id_format.as_str()
    );
    Ok(())
}
