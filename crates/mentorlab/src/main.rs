//! Entry point for the mentoring lab scheduling service.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::db::ScheduleDb;
use crate::types::AppState;

mod config;
mod db;
mod scheduling;
mod server;
mod types;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load_from_file(Path::new(&path))
            .map_err(|e| anyhow::anyhow!("Failed to load config from {}: {}", path, e))?,
        None => {
            info!("No config file given; using defaults");
            AppConfig::default()
        }
    };

    let db = ScheduleDb::new(&config.db_path);
    info!("Opened scheduling database at {}", config.db_path);

    let bind_address = config.bind_address();
    let state = Arc::new(AppState::new(db, config));
    let router = server::create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("Listening on {}", bind_address);

    axum::serve(listener, router)
        .await
        .context("Server exited with an error")?;

    Ok(())
}
