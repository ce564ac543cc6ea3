//! The `serve` command: run the exercise API server.

use anyhow::{Context, Result};
use clap::Args;
use sortlab_gateway::{run_server, GatewayState};
use sortlab_storage::RedbExerciseStore;
use sortlab_types::ServiceConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path of the TOML configuration file. A missing file runs on defaults.
    #[clap(long, default_value = "sortlab.toml")]
    pub config: PathBuf,

    /// Override the configured listen address.
    #[clap(long)]
    pub listen_addr: Option<String>,

    /// Override the configured database file.
    #[clap(long)]
    pub db_path: Option<PathBuf>,
}

/// Resolves the effective configuration: file, then environment, then flags.
pub fn load_config(args: &ServeArgs) -> Result<ServiceConfig> {
    let mut config = if args.config.exists() {
        let raw = std::fs::read_to_string(&args.config)
            .with_context(|| format!("reading {}", args.config.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing {}", args.config.display()))?
    } else {
        ServiceConfig::default()
    };

    if let Ok(addr) = std::env::var("SORTLAB_LISTEN_ADDR") {
        config.listen_addr = addr;
    }
    if let Ok(path) = std::env::var("SORTLAB_DB_PATH") {
        config.db_path = path.into();
    }
    if let Some(addr) = &args.listen_addr {
        config.listen_addr = addr.clone();
    }
    if let Some(path) = &args.db_path {
        config.db_path = path.clone();
    }
    Ok(config)
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let config = load_config(&args)?;
    sortlab_telemetry::init_tracing()?;

    // The store handle is attached once the database is open; requests
    // arriving before then are answered 503 rather than queued.
    let state = Arc::new(GatewayState::new());
    {
        let state = state.clone();
        let db_path = config.db_path.clone();
        tokio::task::spawn_blocking(move || match RedbExerciseStore::open(&db_path) {
            Ok(store) => {
                state.attach_store(Arc::new(store));
                tracing::info!(target: "cli", path = %db_path.display(), "exercise store attached");
            }
            Err(e) => {
                tracing::error!(target: "cli", error = %e, path = %db_path.display(), "failed to open exercise store");
            }
        });
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(target: "cli", error = %e, "failed to install CTRL+C handler");
        }
        let _ = shutdown_tx.send(true);
    });

    run_server(&config, state, shutdown_rx).await
}
