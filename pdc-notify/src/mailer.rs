//! Outbound mail seam
//!
//! The real transport lives outside this service; the pipeline only needs
//! `send`. Anything the transport raises (including its own timeouts) is a
//! delivery failure.

use async_trait::async_trait;
use tracing::info;

/// Black-box outbound mail transport
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, text: &str, html: &str) -> anyhow::Result<()>;
}

/// Development transport: logs the message and reports success
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, text: &str, _html: &str) -> anyhow::Result<()> {
        info!("Mail to {}: {} ({} bytes text)", to, subject, text.len());
        Ok(())
    }
}
