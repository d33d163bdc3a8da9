//! Run audit log
//!
//! One append-only row per pipeline run recording how many users were
//! notified. Partial runs (delivery failure partway through) log the count
//! delivered before the failure.

use pdc_common::db::models::NotificationLogEntry;
use pdc_common::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Append one audit row for a completed (or partially completed) run
pub async fn record_run(pool: &SqlitePool, user_count: u64) -> Result<()> {
    sqlx::query("INSERT INTO notification_log (user_count) VALUES (?)")
        .bind(user_count as i64)
        .execute(pool)
        .await?;

    info!("Notification run recorded: {} users notified", user_count);
    Ok(())
}

/// Most recent run records, newest first, for operational tooling
pub async fn recent_runs(pool: &SqlitePool, limit: i64) -> Result<Vec<NotificationLogEntry>> {
    let entries = sqlx::query_as::<_, NotificationLogEntry>(
        "SELECT id, user_count, created_at FROM notification_log ORDER BY id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
