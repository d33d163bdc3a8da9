//! pdc-notify library - notification fan-out pipeline
//!
//! Detects pending events on catalog entities, fans them out to every user
//! following an ancestor location, batches per user, delivers through the
//! mail seam, and audit-logs each run.

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;

pub mod api;
pub mod batch;
pub mod closure;
pub mod deliver;
pub mod error;
pub mod kinds;
pub mod mailer;
pub mod pipeline;
pub mod reconcile;
pub mod run_log;

pub use error::NotifyError;
pub use mailer::{LogMailer, Mailer};
pub use pipeline::{run_notifications, RunSummary};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Outbound mail transport
    pub mailer: Arc<dyn Mailer>,
    /// Single-flight guard for pipeline runs triggered over HTTP
    pub run_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            db,
            mailer,
            run_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/notifications", post(api::trigger_notifications))
        .route("/api/notifications/log", get(api::get_notification_log))
        .merge(api::health_routes())
        .with_state(state)
}
