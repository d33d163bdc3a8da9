//! Database access for the data catalog

pub mod init;
pub mod models;

pub use init::init_database;
