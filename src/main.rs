use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use devtrack_lib::config::Settings;
use devtrack_lib::http::{self, AppState};
use devtrack_lib::store::JsonFileStore;

#[derive(Parser)]
#[command(name = "devtrack", about = "Personal development tracker API server", version)]
struct Args {
    /// TOML config file (overrides DEVTRACK_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides the configured bind_addr)
    #[arg(long)]
    bind: Option<SocketAddr>,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    log::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut settings = Settings::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }

    let database_dir = settings.database_dir();
    let store = JsonFileStore::open(&database_dir)
        .with_context(|| format!("Failed to open database at {}", database_dir.display()))?;
    log::info!("Using database {}", database_dir.display());

    let listener = TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;

    let state = AppState::new(settings, Arc::new(store));
    http::serve(listener, state, shutdown_signal()).await?;
    Ok(())
}
