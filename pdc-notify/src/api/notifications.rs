//! Notification pipeline endpoints
//!
//! POST /api/notifications triggers one pipeline run. The handler serializes
//! overlapping triggers through the state's run lock; the pipeline itself is
//! not safe for concurrent runs against one store.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::pipeline::run_notifications;
use crate::run_log::recent_runs;
use crate::AppState;

/// POST /api/notifications
///
/// Returns 200 with `{message, count}` on success; 500 with `{error, sent}`
/// on failure so operators can see how many batches completed first.
pub async fn trigger_notifications(State(state): State<AppState>) -> Response {
    let _run_guard = state.run_lock.lock().await;

    match run_notifications(&state.db, state.mailer.as_ref()).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => {
            error!("Notification run failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": err.to_string(),
                    "sent": err.batches_sent(),
                })),
            )
                .into_response()
        }
    }
}

/// Query parameters for the run log
#[derive(Debug, Deserialize)]
pub struct LogQuery {
    /// Maximum rows to return (newest first)
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

/// GET /api/notifications/log
///
/// Recent run audit rows for operational tooling.
pub async fn get_notification_log(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> Response {
    match recent_runs(&state.db, query.limit.clamp(1, 500)).await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(err) => {
            error!("Failed to read notification log: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}
