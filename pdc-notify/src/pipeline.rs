//! Pipeline entry point
//!
//! One run: reconcile the queues, deliver every pending batch, append the
//! audit row. Callers (scheduler or admin endpoint) must ensure at most one
//! run executes at a time; the steps within a run are strictly sequential.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::deliver::deliver_all;
use crate::error::NotifyError;
use crate::mailer::Mailer;
use crate::reconcile::reconcile_all;
use crate::run_log::record_run;

/// Outcome of a successful notification run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub message: String,
    pub count: u64,
}

/// Execute one full notification run
pub async fn run_notifications(
    pool: &SqlitePool,
    mailer: &dyn Mailer,
) -> Result<RunSummary, NotifyError> {
    let reconciled = reconcile_all(pool).await?;
    info!(
        "Reconciliation queued {} entries ({} data request, {} data source)",
        reconciled.total(),
        reconciled.data_request_entries,
        reconciled.data_source_entries
    );

    match deliver_all(pool, mailer).await {
        Ok(count) => {
            record_run(pool, count).await?;
            Ok(RunSummary {
                message: "Notifications sent successfully.".to_string(),
                count,
            })
        }
        Err(err @ NotifyError::Delivery { .. }) => {
            // Partial progress is still audit-logged as this run's count
            record_run(pool, err.batches_sent()).await?;
            Err(err)
        }
        Err(err) => Err(err),
    }
}
