//! safe_fetch library: SSRF-safe URL fetching
//!
//! This library fetches user-supplied URLs server-side without letting them
//! reach internal infrastructure. Every hop of a fetch is resolved, every
//! resolved address is checked, and the connection is opened to one of the
//! checked addresses rather than to the hostname, so a DNS answer that changes
//! between check and connect cannot redirect the request.
//!
//! # Example
//!
//! ```no_run
//! use safe_fetch::{FetchConfig, FetchOutcome, Fetcher};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = Fetcher::new(FetchConfig::default());
//!
//! match fetcher.fetch("https://example.com/article").await {
//!     Ok(FetchOutcome::Fetched(page)) => println!("{} bytes from {}", page.body.len(), page.final_url),
//!     Ok(FetchOutcome::Unavailable(reason)) => println!("unavailable: {}", reason),
//!     Err(e) if e.is_security_rejection() => println!("rejected: {}", e),
//!     Err(e) => println!("could not resolve: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod config;
pub mod dns;
mod error_handling;
mod fetch;
pub mod initialization;
pub mod security;
pub mod server;

// Re-export public API
pub use config::{Cli, Command, FetchConfig, LogFormat, LogLevel, ResolverBackend};
pub use dns::{
    BoundedResolver, HickoryLookup, LookupHost, ResolvedAddress, StaticLookup, SystemLookup,
};
pub use error_handling::{ErrorKind, FetchError, InitializationError, UnavailableReason};
pub use fetch::{FetchOutcome, FetchedPage, Fetcher, RedirectHop};
pub use security::{classify, is_safe, Policy, SafeUrl, UnsafeRange, UrlValidator, ValidatedTarget};
