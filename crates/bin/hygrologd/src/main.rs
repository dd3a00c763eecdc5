//! # hygrologd — hygrolog daemon
//!
//! Composition root that wires all adapters together and starts the
//! collector and the HTTP server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Open the `SQLite` pool and ensure the readings schema exists
//! - Build the BLE sensor source and the collection scheduler
//! - Build the axum router over the same repository
//! - Bind to a TCP port and serve until Ctrl-C / SIGTERM, then stop the
//!   collector after its current cycle
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use hygrolog_adapter_ble::{BleSensorSource, BtleplugCentral};
use hygrolog_adapter_http_axum::state::AppState;
use hygrolog_adapter_storage_sqlite_sqlx::SqliteReadingRepository;
use hygrolog_app::services::collection_scheduler::CollectionScheduler;
use hygrolog_app::services::reading_service::ReadingService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = hygrolog_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let repo = SqliteReadingRepository::new(db.pool().clone());

    // Collector
    let source = Arc::new(BleSensorSource::new(BtleplugCentral, config.sensor.clone()));
    let scheduler = CollectionScheduler::new(source, repo.clone(), config.collector.interval());
    scheduler.prepare().await?;

    let cancel = CancellationToken::new();
    let collector = tokio::spawn({
        let cancel = cancel.clone();
        async move { scheduler.run(cancel).await }
    });

    // HTTP
    let state = AppState::new(ReadingService::new(repo));
    let app = hygrolog_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, device = %config.sensor.address, "hygrologd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    cancel.cancel();
    if let Err(err) = collector.await {
        tracing::error!(%err, "collector task ended abnormally");
    }
    tracing::info!("hygrologd stopped");

    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM, cancelling the collector on the way out.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
        () = cancel.cancelled() => {}
    }

    tracing::info!("shutdown requested");
    cancel.cancel();
}
