//! Hostname resolution.
//!
//! This module provides:
//! - [`LookupHost`] backends: the OS resolver, hickory-resolver, and a static table
//! - [`BoundedResolver`], which enforces a wall-clock deadline over any backend
//!   and caps how many lookups run at once
//!
//! Nothing here caches answers. Every call performs a fresh lookup.

mod lookup;
mod resolution;

// Re-export public API
pub use lookup::{HickoryLookup, Lookup, LookupHost, StaticLookup, SystemLookup};
pub use resolution::{AddressFamily, BoundedResolver, ResolvedAddress};

#[cfg(test)]
mod tests;
