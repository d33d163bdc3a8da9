//! Batch assembler
//!
//! Groups one user's unsent queue entries (across both entity kinds) into a
//! single outbound batch. Users are processed lowest id first so batch
//! selection is deterministic; `next_batch` returning `None` is the delivery
//! loop's termination condition.

use pdc_common::db::models::User;
use pdc_common::{Error, Result};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::kinds::{self, ALL_KINDS};

/// One pending event as presented to the user
#[derive(Debug, Clone, Serialize)]
pub struct EventInfo {
    pub event_id: i64,
    pub event_type: String,
    pub entity_id: i64,
    pub entity_kind: &'static str,
    pub entity_name: String,
}

/// All of one user's unsent notifications, delivered as one message
#[derive(Debug, Clone, Serialize)]
pub struct EventBatch {
    pub user_id: i64,
    pub user_email: String,
    pub events: Vec<EventInfo>,
}

/// Select the next user with unsent queue entries and load their batch
///
/// Returns `None` once no user has any unsent entry in either queue.
pub async fn next_batch(pool: &SqlitePool) -> Result<Option<EventBatch>> {
    let user_id: Option<i64> = sqlx::query_scalar(
        "SELECT user_id FROM (\
             SELECT user_id FROM data_request_notification_queue WHERE sent_at IS NULL \
             UNION \
             SELECT user_id FROM data_source_notification_queue WHERE sent_at IS NULL\
         ) ORDER BY user_id LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    let Some(user_id) = user_id else {
        return Ok(None);
    };

    let user: User = sqlx::query_as("SELECT id, email FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("user {} has queue entries but no row", user_id)))?;

    let mut events = Vec::new();
    for kind in ALL_KINDS {
        let sql = format!(
            "SELECT q.event_id, pe.event_type, e.id, e.{name_col} \
             FROM {queue} q \
             JOIN {pending} pe ON pe.id = q.event_id \
             JOIN {entity} e ON e.id = pe.{entity_col} \
             WHERE q.user_id = ? AND q.sent_at IS NULL \
             ORDER BY q.event_id",
            name_col = kind.entity_name_column,
            queue = kind.queue_table,
            pending = kind.pending_table,
            entity = kind.entity_table,
            entity_col = kind.entity_id_column,
        );
        let rows: Vec<(i64, String, i64, String)> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        events.extend(rows.into_iter().map(|(event_id, event_type, entity_id, entity_name)| {
            EventInfo {
                event_id,
                event_type,
                entity_id,
                entity_kind: kind.name,
                entity_name,
            }
        }));
    }

    Ok(Some(EventBatch {
        user_id,
        user_email: user.email,
        events,
    }))
}

/// Mark every entry of a delivered batch as sent
///
/// Applies to exactly the event ids the batch carried, in one committed
/// transaction. Called only after the mail transport reported success; the
/// send itself never shares this transaction. UNSENT → SENT is terminal.
pub async fn mark_sent(pool: &SqlitePool, batch: &EventBatch) -> Result<()> {
    let mut tx = pool.begin().await?;
    for event in &batch.events {
        let kind = kinds::by_name(event.entity_kind).ok_or_else(|| {
            Error::Internal(format!("unknown entity kind: {}", event.entity_kind))
        })?;
        let sql = format!(
            "UPDATE {queue} SET sent_at = datetime('now') \
             WHERE user_id = ? AND event_id = ? AND sent_at IS NULL",
            queue = kind.queue_table,
        );
        sqlx::query(&sql)
            .bind(batch.user_id)
            .bind(event.event_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}
