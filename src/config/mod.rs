//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, pool sizes)
//! - The library-level [`FetchConfig`]
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Cli, Command, FetchConfig, LogFormat, LogLevel, ResolverBackend};
