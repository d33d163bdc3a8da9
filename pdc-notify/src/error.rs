//! Pipeline error types

use thiserror::Error;

/// Errors surfaced to the caller of a notification run
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Store unavailable or query failed; fatal, nothing assumed committed
    #[error("Store error: {0}")]
    Store(#[from] pdc_common::Error),

    /// Mail transport failed; batches sent before the failure stay sent,
    /// the rest remain queued for the next run
    #[error("Delivery failed after {sent} successful batches: {source}")]
    Delivery {
        sent: u64,
        #[source]
        source: anyhow::Error,
    },
}

impl NotifyError {
    /// Batches delivered before this run failed
    pub fn batches_sent(&self) -> u64 {
        match self {
            NotifyError::Store(_) => 0,
            NotifyError::Delivery { sent, .. } => *sent,
        }
    }
}
