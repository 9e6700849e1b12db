//! Counter service daemon.
//!
//! Serves the HTTP increment API over a SQLite-backed (or in-memory) counter
//! store.
//!
//! # Usage
//!
//! ```sh
//! tallyd --bind 127.0.0.1:8080 --db /var/lib/tally/tally.db
//! ```
//!
//! All flags can also be set through `TALLY_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use tally_api::{HttpApi, StoreHandler};
use tally_observe::{LoggerConfig, LoggerLevel, init_logger};
use tally_store::{CounterStore, MemoryStore, SqliteStore};

/// Default listen address.
const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Default SQLite database path.
const DEFAULT_DB_PATH: &str = "tally.db";

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "tallyd")]
#[command(about = "Atomic counter service daemon")]
struct Args {
    /// Socket address to listen on.
    #[arg(short, long, default_value = DEFAULT_BIND, env = "TALLY_BIND")]
    bind: String,

    /// Path to the SQLite database file.
    #[arg(short, long, default_value = DEFAULT_DB_PATH, env = "TALLY_DB")]
    db: PathBuf,

    /// Keep counters in process memory instead of SQLite (lost on restart).
    #[arg(long, env = "TALLY_IN_MEMORY")]
    in_memory: bool,

    /// Log level filter expression (e.g. "info", "tally_api=debug,info").
    #[arg(long, default_value = "info", env = "TALLY_LOG_LEVEL")]
    log_level: String,

    /// Log output format: text, json or journald.
    #[arg(long, default_value = "text", env = "TALLY_LOG_FORMAT")]
    log_format: String,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 1) logger
    let cfg = LoggerConfig {
        format: args.log_format.parse()?,
        level: LoggerLevel::new(&args.log_level)?,
        ..Default::default()
    };
    init_logger(&cfg)?;
    info!("logger initialized");

    // 2) counter store
    let store: Arc<dyn CounterStore> = if args.in_memory {
        info!("using in-memory counter store");
        Arc::new(MemoryStore::new())
    } else {
        info!(path = %args.db.display(), "opening sqlite counter store");
        let store = SqliteStore::open(&args.db).context("failed to open counter database")?;
        Arc::new(store)
    };

    // 3) http api
    let handler = Arc::new(StoreHandler::new(store));
    let router = HttpApi::new(handler).router();

    // 4) serve until shutdown
    let addr: SocketAddr = args.bind.parse().context("invalid bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "counter service listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("counter service stopped");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(err) => error!("failed to install Ctrl+C handler: {}", err),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => error!("failed to install SIGTERM handler: {}", err),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received SIGINT, shutting down");
        }
        _ = terminate => {
            info!("received SIGTERM, shutting down");
        }
    }
}
