use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use kiosk_core::calendar::CalendarEnv;
use kiosk_core::{ConfigOverrides, KioskConfig};
use kiosk_server::state::AppState;

const DEFAULT_LOG_FILTER: &str = "kiosk_server=info,kiosk_core=info,tower_http=info";

/// Serve kiosk navigation and calendar JSON
#[derive(Parser)]
#[command(name = "kiosk-server", version, about)]
struct Cli {
    /// Config file (TOML); defaults to <config dir>/kiosk/config.toml if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding template.json and the document folders
    #[arg(long)]
    files_dir: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();

    let config = KioskConfig::load(&ConfigOverrides {
        config_file: cli.config,
        files_dir: cli.files_dir,
        port: cli.port,
    })?;

    tracing::info!(files_dir = %config.files_dir.display(), "using files directory");

    let state = AppState::new(&config, CalendarEnv::from_process())?;
    let app = kiosk_server::app(state);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    tracing::info!("kiosk-server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}
