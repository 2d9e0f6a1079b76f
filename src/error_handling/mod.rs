//! Error handling.
//!
//! This module provides:
//! - [`FetchError`], raised for rejected URLs and failed name resolution
//! - [`ErrorKind`], the rejection/transient split callers branch on
//! - [`UnavailableReason`], the soft outcomes of a fetch that found no content
//! - [`InitializationError`] for logger and client setup
//!
//! Security-significant errors are never downgraded to an `UnavailableReason`.

mod types;

// Re-export public API
pub use types::{ErrorKind, FetchError, InitializationError, UnavailableReason};
