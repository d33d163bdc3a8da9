//! HTTP API handlers for pdc-notify

pub mod health;
pub mod notifications;

pub use health::health_routes;
pub use notifications::{get_notification_log, trigger_notifications};
