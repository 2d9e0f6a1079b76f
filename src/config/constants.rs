//! Configuration constants.
//!
//! This module defines the defaults used by the fetch engine, including
//! timeouts, pool sizes, and redirect/body limits.

use std::time::Duration;

// DNS resolution
/// DNS resolution deadline per hostname
/// The caller never waits longer than this, even if the lookup itself keeps running
pub const DNS_TIMEOUT: Duration = Duration::from_secs(5);
/// Number of lookups allowed to run at once (resolver worker pool size)
/// Further lookups queue for a permit; queue time counts against their deadline
pub const DNS_WORKERS: usize = 4;
/// Per-query timeout handed to the hickory backend
pub const HICKORY_QUERY_TIMEOUT_SECS: u64 = 3;

// Network operation timeouts
/// TCP connection timeout (includes the TLS handshake)
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Response read timeout
pub const READ_TIMEOUT: Duration = Duration::from_secs(30);

// Redirect handling
/// Maximum number of redirect hops to follow
/// A chain of exactly this many redirects is followed; one more terminates the fetch
pub const MAX_REDIRECT_HOPS: usize = 5;

/// Status codes treated as redirects
pub const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

// Response and body size limits
/// Maximum response body size in bytes (10MB)
/// Larger bodies are abandoned to prevent memory exhaustion
pub const MAX_RESPONSE_BODY_SIZE: usize = 10 * 1024 * 1024;

/// User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; TechNewsCurator/1.0)";

// Ingest front end
/// Default bind address for `safe_fetch serve`
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

// CLI exit codes
/// Validation passed or the page was fetched
pub const EXIT_OK: i32 = 0;
/// Content unavailable or the host could not be resolved
pub const EXIT_UNAVAILABLE: i32 = 1;
/// The URL (or a redirect target) was rejected as unsafe
pub const EXIT_REJECTED: i32 = 2;
