//! Queue reconciler
//!
//! Joins followed locations, the location closure, entity-location
//! associations, and pending events into missing (user, event) queue rows.
//! Each kind is reconciled by a single INSERT..SELECT statement, which makes
//! the pass per-kind atomic and idempotent: the NOT EXISTS filter is
//! evaluated fresh inside the statement, so re-running produces no
//! duplicates and never touches rows that are already queued or sent.

use pdc_common::Result;
use sqlx::SqlitePool;
use tracing::info;

use crate::closure::LOCATION_CLOSURE_CTE;
use crate::kinds::{EntityKind, DATA_REQUESTS, DATA_SOURCES};

/// Queue rows inserted by one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub data_request_entries: u64,
    pub data_source_entries: u64,
}

impl ReconcileSummary {
    pub fn total(&self) -> u64 {
        self.data_request_entries + self.data_source_entries
    }
}

/// Reconcile the notification queues for every entity kind
///
/// Idempotent; run once per pipeline invocation, before delivery.
pub async fn reconcile_all(pool: &SqlitePool) -> Result<ReconcileSummary> {
    Ok(ReconcileSummary {
        data_request_entries: reconcile_kind(pool, &DATA_REQUESTS).await?,
        data_source_entries: reconcile_kind(pool, &DATA_SOURCES).await?,
    })
}

/// Insert missing (user, event) queue rows for one kind
///
/// Fan-out policy: a follower of a location receives events for entities in
/// every descendant location, self included; a follower of the national root
/// receives every event of the kind. DISTINCT collapses multiple containment
/// paths to the same entity into one candidate pair.
async fn reconcile_kind(pool: &SqlitePool, kind: &EntityKind) -> Result<u64> {
    let sql = format!(
        "WITH RECURSIVE {cte} \
         INSERT INTO {queue} (user_id, event_id) \
         SELECT DISTINCT f.user_id, pe.id \
         FROM followed_locations f \
         JOIN location_closure ON location_closure.root_id = f.location_id \
         JOIN ({location_join}) el ON el.location_id = location_closure.location_id \
         JOIN {pending} pe ON pe.{entity_col} = el.entity_id \
         WHERE NOT EXISTS (\
             SELECT 1 FROM {queue} q \
             WHERE q.user_id = f.user_id AND q.event_id = pe.id\
         )",
        cte = LOCATION_CLOSURE_CTE,
        queue = kind.queue_table,
        location_join = kind.location_join,
        pending = kind.pending_table,
        entity_col = kind.entity_id_column,
    );

    let result = sqlx::query(&sql).execute(pool).await?;
    let inserted = result.rows_affected();
    info!("Queued {} new {} notification entries", inserted, kind.name);
    Ok(inserted)
}
