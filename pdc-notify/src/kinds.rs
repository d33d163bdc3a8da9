//! Watched entity kinds
//!
//! The pipeline fans out events for two kinds of catalog entity: data
//! requests (located directly through a link table) and data sources (located
//! through their owning agency). Both kinds share one code path; everything
//! kind-specific lives in these descriptors.

/// Static descriptor for one watched entity kind
///
/// All fields are table/column names or SQL fragments baked in at compile
/// time; user-supplied values are always bound as query parameters, never
/// interpolated.
#[derive(Debug, Clone, Copy)]
pub struct EntityKind {
    /// Kind label carried on batch events ("data_request", "data_source")
    pub name: &'static str,
    /// Table holding the entities themselves
    pub entity_table: &'static str,
    /// Display-name column on the entity table
    pub entity_name_column: &'static str,
    /// Column on the pending-event table referencing the entity
    pub entity_id_column: &'static str,
    /// Pending-event table for this kind
    pub pending_table: &'static str,
    /// Per-user notification queue table for this kind
    pub queue_table: &'static str,
    /// Sub-select producing `(entity_id, location_id)` association rows
    pub location_join: &'static str,
}

pub const DATA_REQUESTS: EntityKind = EntityKind {
    name: "data_request",
    entity_table: "data_requests",
    entity_name_column: "title",
    entity_id_column: "data_request_id",
    pending_table: "data_request_pending_events",
    queue_table: "data_request_notification_queue",
    location_join:
        "SELECT data_request_id AS entity_id, location_id FROM data_request_locations",
};

pub const DATA_SOURCES: EntityKind = EntityKind {
    name: "data_source",
    entity_table: "data_sources",
    entity_name_column: "name",
    entity_id_column: "data_source_id",
    pending_table: "data_source_pending_events",
    queue_table: "data_source_notification_queue",
    location_join: "SELECT ds.id AS entity_id, a.location_id AS location_id \
                    FROM data_sources ds JOIN agencies a ON a.id = ds.agency_id",
};

/// Every kind the pipeline reconciles and delivers, in processing order
pub const ALL_KINDS: [&EntityKind; 2] = [&DATA_REQUESTS, &DATA_SOURCES];

/// Look up a kind descriptor by its label
pub fn by_name(name: &str) -> Option<&'static EntityKind> {
    ALL_KINDS.iter().copied().find(|kind| kind.name == name)
}
