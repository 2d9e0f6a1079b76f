//! Ingest front end HTTP handlers.

mod health;
mod ingest;

pub use health::health_handler;
pub use ingest::{fetch_handler, validate_handler};
