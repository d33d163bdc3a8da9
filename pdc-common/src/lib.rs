//! # PDC Common Library
//!
//! Shared code for the public data catalog services including:
//! - Database schema and initialization
//! - Database models
//! - Notification event types
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod events;

pub use error::{Error, Result};
