//! Notification event types
//!
//! Watched state transitions on catalog entities. The CRUD layer records one
//! pending event per (entity, event type); the notification pipeline fans it
//! out to followers. The string forms here must match the CHECK constraints
//! on the pending-event tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Watched transitions on a data request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataRequestEvent {
    /// Request moved to "ready to start" status
    ReadyToStart,
    /// Request moved to "complete" status
    Complete,
}

impl DataRequestEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataRequestEvent::ReadyToStart => "ready_to_start",
            DataRequestEvent::Complete => "complete",
        }
    }
}

impl fmt::Display for DataRequestEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataRequestEvent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ready_to_start" => Ok(DataRequestEvent::ReadyToStart),
            "complete" => Ok(DataRequestEvent::Complete),
            other => Err(Error::Internal(format!(
                "unknown data request event type: {}",
                other
            ))),
        }
    }
}

/// Watched transitions on a data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceEvent {
    /// Source approved for publication in the catalog
    Approved,
}

impl DataSourceEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceEvent::Approved => "approved",
        }
    }
}

impl fmt::Display for DataSourceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSourceEvent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(DataSourceEvent::Approved),
            other => Err(Error::Internal(format!(
                "unknown data source event type: {}",
                other
            ))),
        }
    }
}
