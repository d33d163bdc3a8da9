//! Delivery driver
//!
//! Drains the notification queues one user batch at a time: assemble, send,
//! then mark sent. The send happens outside any transaction; the mark is a
//! separate committed write gated on the transport's success. A crash between
//! the two re-sends that batch on the next run (at-least-once, never
//! at-most-once).

use pdc_common::events::{DataRequestEvent, DataSourceEvent};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::batch::{mark_sent, next_batch, EventBatch, EventInfo};
use crate::error::NotifyError;
use crate::mailer::Mailer;

const SUBJECT: &str = "Updates to followed locations";

/// Deliver every pending batch, returning how many users were notified
///
/// On a transport failure the loop stops immediately; the error carries the
/// number of batches that were already sent and marked. Their queue entries
/// stay sent; the failing batch and everything after it remain unsent.
pub async fn deliver_all(pool: &SqlitePool, mailer: &dyn Mailer) -> Result<u64, NotifyError> {
    let mut sent_batches = 0u64;

    loop {
        let Some(batch) = next_batch(pool).await? else {
            break;
        };

        let (text, html) = render_message(&batch);
        if let Err(source) = mailer.send(&batch.user_email, SUBJECT, &text, &html).await {
            warn!(
                "Delivery to user {} failed after {} successful batches: {}",
                batch.user_id, sent_batches, source
            );
            return Err(NotifyError::Delivery {
                sent: sent_batches,
                source,
            });
        }

        mark_sent(pool, &batch).await?;
        sent_batches += 1;
        info!(
            "Sent batch of {} events to user {}",
            batch.events.len(),
            batch.user_id
        );
    }

    Ok(sent_batches)
}

/// Render a batch into the text and HTML bodies of one message
pub fn render_message(batch: &EventBatch) -> (String, String) {
    let mut text = String::from("There have been updates to locations you follow.\n\n");
    let mut html = String::from("<p>There have been updates to locations you follow.</p>\n<ul>\n");

    for event in &batch.events {
        let line = describe(event);
        text.push_str(&line);
        text.push('\n');
        html.push_str("  <li>");
        html.push_str(&line);
        html.push_str("</li>\n");
    }
    html.push_str("</ul>\n");

    (text, html)
}

/// One human-readable line for a batch event
fn describe(event: &EventInfo) -> String {
    match event.entity_kind {
        "data_request" => match event.event_type.parse::<DataRequestEvent>() {
            Ok(DataRequestEvent::ReadyToStart) => {
                format!("Data request \"{}\" is ready to start.", event.entity_name)
            }
            Ok(DataRequestEvent::Complete) => {
                format!("Data request \"{}\" is complete.", event.entity_name)
            }
            Err(_) => format!("Data request \"{}\": {}", event.entity_name, event.event_type),
        },
        _ => match event.event_type.parse::<DataSourceEvent>() {
            Ok(DataSourceEvent::Approved) => {
                format!("Data source \"{}\" was approved.", event.entity_name)
            }
            Err(_) => format!("Data source \"{}\": {}", event.entity_name, event.event_type),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_line_per_event() {
        let batch = EventBatch {
            user_id: 1,
            user_email: "a@example.com".to_string(),
            events: vec![
                EventInfo {
                    event_id: 1,
                    event_type: "complete".to_string(),
                    entity_id: 7,
                    entity_kind: "data_request",
                    entity_name: "Use of force reports".to_string(),
                },
                EventInfo {
                    event_id: 2,
                    event_type: "approved".to_string(),
                    entity_id: 9,
                    entity_kind: "data_source",
                    entity_name: "Dispatch logs".to_string(),
                },
            ],
        };

        let (text, html) = render_message(&batch);
        assert!(text.contains("\"Use of force reports\" is complete"));
        assert!(text.contains("\"Dispatch logs\" was approved"));
        assert_eq!(html.matches("<li>").count(), 2);
    }
}
