//! Course Review server.
//!
//! Main entry point that loads configuration, picks the moderation and
//! revocation stores, and starts the HTTP server.

use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use review_core::config::{AppConfig, StoreBackend};
use review_core::error::AppError;
use review_database::{
    DatabasePool, MemoryModerationStore, MemorySessionRevocationStore, ModerationRepository,
    ModerationStore, SessionRevocationRepository, SessionRevocationStore,
};

/// Course Review server.
#[derive(Debug, Parser)]
#[command(name = "review-server", version, about)]
struct Args {
    /// Runtime environment; selects `config/{env}.toml` and the runtime mode.
    #[arg(long, env = "COURSEREVIEW_ENV", default_value = "production")]
    env: String,

    /// Only run database migrations, then exit.
    #[arg(long)]
    migrate_only: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match AppConfig::load(&args.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config, args.migrate_only).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig, migrate_only: bool) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.server.environment,
        "Starting Course Review"
    );

    let (store, revocations, pool): (
        Arc<dyn ModerationStore>,
        Arc<dyn SessionRevocationStore>,
        Option<DatabasePool>,
    ) = match config.moderation.store {
        StoreBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = DatabasePool::connect(&config.database).await?;
            pool.migrate().await?;
            let repo = ModerationRepository::new(pool.pool().clone());
            let revocations = SessionRevocationRepository::new(pool.pool().clone());
            (Arc::new(repo), Arc::new(revocations), Some(pool))
        }
        StoreBackend::Memory => {
            if migrate_only {
                return Err(AppError::configuration(
                    "--migrate-only requires the postgres store",
                ));
            }
            tracing::warn!("Using in-memory stores; reviews and logouts are not persisted");
            (
                Arc::new(MemoryModerationStore::new()),
                Arc::new(MemorySessionRevocationStore::new()),
                None,
            )
        }
    };

    if migrate_only {
        tracing::info!("Migrations complete");
    } else {
        let reconciled = store.reconcile().await?;
        if reconciled > 0 {
            tracing::warn!(reconciled, "Removed stale staged reviews at startup");
        }
        let purged = revocations.purge_revocations(Utc::now()).await?;
        if purged > 0 {
            tracing::info!(purged, "Purged expired session revocations at startup");
        }
        review_api::run_server(config, store, revocations).await?;
    }

    if let Some(pool) = pool {
        pool.close().await;
    }
    Ok(())
}
