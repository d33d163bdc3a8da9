//! pdc-notify - notification pipeline service for the public data catalog
//!
//! Hosts the endpoint that triggers one notification run (reconcile queues,
//! deliver per-user batches, append the audit log) plus a health check and a
//! read-only view of the run log.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use pdc_common::config::{database_path, resolve_root_folder};
use pdc_common::db::init_database;
use pdc_notify::{build_router, AppState, LogMailer};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting PDC Notification Service (pdc-notify) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    // Optional first CLI argument overrides the root folder
    let cli_root = std::env::args().nth(1);
    let root_folder = resolve_root_folder(cli_root.as_deref())?;
    let db_path = database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;
    info!("✓ Connected to database");

    // The real mail transport is wired in by deployment; default to logging
    let state = AppState::new(pool, Arc::new(LogMailer));
    let app = build_router(state);

    let port: u16 = std::env::var("PDC_NOTIFY_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5730);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("pdc-notify listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
