//! Shared resource setup.
//!
//! This module provides functions to initialize:
//! - the logger (plain or JSON)
//! - the hickory DNS resolver
//! - the per-hop HTTP client pinned to a validated address
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;
mod resolver;

// Re-export public API
pub use client::init_pinned_client;
pub use logger::init_logger_with;
pub use resolver::init_resolver;
