//! Database initialization
//!
//! Creates the catalog database on first run and brings an existing database
//! up to the current schema. All statements are idempotent
//! (`CREATE TABLE IF NOT EXISTS`), so re-running initialization is safe.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Set busy timeout
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Catalog tables (owned by the CRUD layer, read by the pipeline)
    create_users_table(&pool).await?;
    create_locations_table(&pool).await?;
    create_location_containment_table(&pool).await?;
    create_followed_locations_table(&pool).await?;
    create_agencies_table(&pool).await?;
    create_data_sources_table(&pool).await?;
    create_data_requests_table(&pool).await?;
    create_data_request_locations_table(&pool).await?;

    // Notification pipeline tables
    create_pending_event_tables(&pool).await?;
    create_notification_queue_tables(&pool).await?;
    create_notification_log_table(&pool).await?;

    Ok(pool)
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the locations table
///
/// Locations are immutable once created except for display metadata. The
/// synthetic 'national' root has no parent and covers every other location.
async fn create_locations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS locations (
            id INTEGER PRIMARY KEY,
            type TEXT NOT NULL CHECK (type IN ('national', 'state', 'county', 'locality')),
            name TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_locations_type ON locations(type)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the location containment table
///
/// Directed (parent, dependent) pairs. Identity pairs are not stored; the
/// closure resolver synthesizes them. Invariant: no cycles.
async fn create_location_containment_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS location_containment (
            parent_location_id INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
            dependent_location_id INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
            PRIMARY KEY (parent_location_id, dependent_location_id),
            CHECK (parent_location_id != dependent_location_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_containment_parent ON location_containment(parent_location_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_followed_locations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS followed_locations (
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            location_id INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (user_id, location_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_followed_locations_location ON followed_locations(location_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_agencies_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS agencies (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            location_id INTEGER NOT NULL REFERENCES locations(id),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_agencies_location ON agencies(location_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the data_sources table
///
/// A data source is located through its owning agency.
async fn create_data_sources_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS data_sources (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            agency_id INTEGER NOT NULL REFERENCES agencies(id),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_data_sources_agency ON data_sources(agency_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_data_requests_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS data_requests (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the data_request_locations link table
///
/// A data request can concern more than one location.
async fn create_data_request_locations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS data_request_locations (
            data_request_id INTEGER NOT NULL REFERENCES data_requests(id) ON DELETE CASCADE,
            location_id INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
            PRIMARY KEY (data_request_id, location_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_request_locations_location ON data_request_locations(location_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the pending-event tables
///
/// One row per watched transition per entity, written by the mutation logic
/// in the CRUD layer. Rows are never deleted by the pipeline; queue entries
/// track per-user delivery state.
async fn create_pending_event_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS data_request_pending_events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            data_request_id INTEGER NOT NULL REFERENCES data_requests(id) ON DELETE CASCADE,
            event_type TEXT NOT NULL CHECK (event_type IN ('ready_to_start', 'complete')),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (data_request_id, event_type)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS data_source_pending_events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            data_source_id INTEGER NOT NULL REFERENCES data_sources(id) ON DELETE CASCADE,
            event_type TEXT NOT NULL CHECK (event_type IN ('approved')),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (data_source_id, event_type)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_request_pending_entity ON data_request_pending_events(data_request_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_source_pending_entity ON data_source_pending_events(data_source_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the per-user notification queue tables
///
/// `sent_at IS NULL` means undelivered. Rows are inserted by the queue
/// reconciler and mutated only by the delivery driver (setting sent_at).
/// No row is ever deleted or reverted to unsent.
async fn create_notification_queue_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS data_request_notification_queue (
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            event_id INTEGER NOT NULL REFERENCES data_request_pending_events(id) ON DELETE CASCADE,
            sent_at TIMESTAMP,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (user_id, event_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS data_source_notification_queue (
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            event_id INTEGER NOT NULL REFERENCES data_source_pending_events(id) ON DELETE CASCADE,
            sent_at TIMESTAMP,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (user_id, event_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Unsent-entry scans drive batch selection
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_request_queue_unsent ON data_request_notification_queue(user_id) WHERE sent_at IS NULL",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_source_queue_unsent ON data_source_notification_queue(user_id) WHERE sent_at IS NULL",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the notification_log table
///
/// Append-only; one row per completed pipeline run, never updated.
async fn create_notification_log_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notification_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_count INTEGER NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (user_count >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
