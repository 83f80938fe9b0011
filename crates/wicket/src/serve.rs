// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `wicket serve` command implementation.
//!
//! Initializes tracing and the SQLite ticket store, then hands the
//! validated configuration to the Discord gateway. Engines and the router
//! are constructed inside the gateway's `ready` handler, where the HTTP
//! handle becomes available.

use std::sync::Arc;

use tracing::{info, warn};

use wicket_config::WicketConfig;
use wicket_core::{TicketStore, WicketError};
use wicket_storage::SqliteTicketStore;

/// Runs the `wicket serve` command.
pub async fn run_serve(config: WicketConfig) -> Result<(), WicketError> {
    init_tracing(&config.log.level);

    info!("starting wicket serve");

    let sqlite = Arc::new(SqliteTicketStore::new(config.storage.clone()));
    sqlite.initialize().await?;
    let store: Arc<dyn TicketStore> = sqlite.clone();
    info!(path = %config.storage.database_path, "ticket store ready");

    let result = wicket_discord::run_gateway(config, store).await;

    // Checkpoint the WAL on the way out.
    if let Err(e) = sqlite.close().await {
        warn!(error = %e, "storage shutdown checkpoint failed");
    }

    info!("wicket serve shutdown complete");
    result
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wicket={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
