//! Database models

use serde::{Deserialize, Serialize};

/// Hierarchy level of a location
///
/// String forms match the CHECK constraint on the locations table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    National,
    State,
    County,
    Locality,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::National => "national",
            LocationType::State => "state",
            LocationType::County => "county",
            LocationType::Locality => "locality",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
}

/// One audit row per completed notification run
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NotificationLogEntry {
    pub id: i64,
    pub user_count: i64,
    pub created_at: chrono::NaiveDateTime,
}
