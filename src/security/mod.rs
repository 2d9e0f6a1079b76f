//! SSRF protection.
//!
//! This module decides whether a URL may be fetched:
//! - [`classifier`] decides whether a single IP address is safe to contact
//! - [`url_validation`] applies that verdict to URLs, resolving hostnames and
//!   rejecting a host if any of its addresses is unsafe
//!
//! Validation is never cached. The fetcher revalidates every redirect hop.

pub mod classifier;
pub mod url_validation;

pub use classifier::{classify, is_safe, Policy, UnsafeRange};
pub use url_validation::{SafeUrl, UrlValidator, ValidatedTarget};

pub(crate) use url_validation::parse_url;
