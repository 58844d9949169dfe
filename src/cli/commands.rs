//! CLI command implementations
//!
//! Startup order for `serve`:
//! 1. Load configuration and install logging
//! 2. Connect and prepare every statement (fatal on failure)
//! 3. Build the GeoJSON cache (fatal on failure)
//! 4. Serve until ctrl-c or SIGTERM
//! 5. Stop the refresh task, close statements and the pool

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::context::AppContext;
use crate::http_server::HttpServer;
use crate::logging;
use crate::store::{DataStore, PgStore};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Check { config } => check(&config),
    }
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    logging::init(&config.logging);
    if !config_path.exists() {
        info!(path = %config_path.display(), "config file not found, using defaults");
    }
    Ok(config)
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::startup_failed(format!("Failed to create tokio runtime: {}", e)))
}

/// Serve the API until shutdown is signalled
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }
    runtime()?.block_on(serve_async(config))
}

async fn serve_async(config: Config) -> CliResult<()> {
    let store: Arc<dyn DataStore> =
        Arc::new(PgStore::connect(&config.database, config.verse_filter).await?);

    let ctx = AppContext::build(store.clone()).await?;
    let refresh = ctx
        .geojson
        .spawn_refresh(store.clone(), config.geojson_refresh());
    match config.geojson_refresh() {
        Some(interval) => info!(?interval, "geojson refresh enabled"),
        None => info!("geojson cached until restart"),
    }

    let server = HttpServer::new(config.http.clone(), ctx);
    let result = server.start(shutdown_signal()).await;

    if let Some(handle) = refresh {
        handle.abort();
    }
    store.close().await;

    result.map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
}

/// Verify the database accepts every statement, then exit
pub fn check(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    runtime()?.block_on(async {
        let store = PgStore::connect(&config.database, config.verse_filter).await?;
        let names: Vec<_> = store.registry().names().collect();
        info!(statements = ?names, "all statements prepared");
        store.close().await;
        Ok::<(), CliError>(())
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
