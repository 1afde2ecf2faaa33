//! Startup orchestration.
//!
//! Order: observability, database, application state, listener. Any
//! failure aborts startup.

use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;

use metrics_exporter_prometheus::BuildError;
use sea_orm::DbErr;
use thiserror::Error;
use tokio::net::TcpListener;

use super::signals::wait_for_signal;
use super::Shutdown;
use crate::auth::HttpIdentityProvider;
use crate::config::AppConfig;
use crate::db;
use crate::http::server::{AppState, HttpServer};
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("invalid protected path pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
pub async fn serve(config: AppConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let db = db::connect(&config.database).await?;
    let bind_address = config.server.bind_address.clone();
    tracing::info!(
        bind_address = %bind_address,
        providers = config.auth.providers.len(),
        admins = config.admin.emails.len(),
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    let state = AppState::new(db, config, Arc::new(HttpIdentityProvider::new()));
    let server = HttpServer::new(state)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Create any missing tables and exit.
pub async fn migrate(mut config: AppConfig) -> Result<(), StartupError> {
    config.database.create_schema = false;
    let db = db::connect(&config.database).await?;
    db::schema::create_schema(&db).await?;
    tracing::info!("Schema is up to date");
    Ok(())
}
