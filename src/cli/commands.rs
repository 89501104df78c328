//! CLI command implementations

use std::fs;
use std::path::{Path, PathBuf};

use crate::http_server::{PieService, ServiceConfig};
use crate::observability::init_tracing;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Run a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::Init { config } => init(&config),
    }
}

/// Resolve the configuration a `serve` run uses
pub fn resolve_config(path: Option<&Path>, port: Option<u16>) -> CliResult<ServiceConfig> {
    let mut config = match path {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(port) = port {
        config.port = port;
    }
    config.validate()?;
    Ok(config)
}

/// Start the service and block until it shuts down
pub fn serve(path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    init_tracing();
    let config = resolve_config(path, port)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let service = PieService::from_config(config).await?;
        service
            .start()
            .await
            .map_err(|e| CliError::serve_failed(e.to_string()))
    })
}

/// Write the default configuration to `path`
pub fn init(path: &Path) -> CliResult<()> {
    if path.exists() {
        return Err(CliError::already_initialized(path.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let config = ServiceConfig {
        data_file: Some(PathBuf::from("./data/pies.json")),
        ..Default::default()
    };
    fs::write(path, serde_json::to_string_pretty(&config)?)?;

    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
