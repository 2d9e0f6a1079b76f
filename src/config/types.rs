//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and the library-level fetch configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::constants::{
    CONNECT_TIMEOUT, DEFAULT_BIND_ADDR, DEFAULT_USER_AGENT, DNS_TIMEOUT, DNS_WORKERS,
    MAX_REDIRECT_HOPS, MAX_RESPONSE_BODY_SIZE, READ_TIMEOUT,
};
use crate::security::Policy;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Which name-resolution backend the resolver pool drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResolverBackend {
    /// The operating system resolver (`getaddrinfo`)
    System,
    /// hickory-resolver using the system DNS configuration
    Hickory,
}

/// Library configuration for the fetch engine (no CLI dependencies).
///
/// # Examples
///
/// ```
/// use safe_fetch::FetchConfig;
/// use std::time::Duration;
///
/// let config = FetchConfig {
///     dns_timeout: Duration::from_millis(500),
///     max_redirects: 3,
///     ..Default::default()
/// };
/// assert_eq!(config.max_redirects, 3);
/// ```
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Deadline for resolving a single hostname
    pub dns_timeout: Duration,

    /// Number of concurrent lookups the resolver pool allows
    pub dns_workers: usize,

    /// Resolver backend used by [`crate::BoundedResolver::from_config`]
    pub resolver: ResolverBackend,

    /// TCP/TLS connection timeout
    pub connect_timeout: Duration,

    /// Response read timeout
    pub read_timeout: Duration,

    /// Maximum number of redirects to follow
    pub max_redirects: usize,

    /// Maximum response body size in bytes
    pub max_body_bytes: usize,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Which addresses may be contacted
    pub policy: Policy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            dns_timeout: DNS_TIMEOUT,
            dns_workers: DNS_WORKERS,
            resolver: ResolverBackend::System,
            connect_timeout: CONNECT_TIMEOUT,
            read_timeout: READ_TIMEOUT,
            max_redirects: MAX_REDIRECT_HOPS,
            max_body_bytes: MAX_RESPONSE_BODY_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            policy: Policy::PublicOnly,
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Check a URL without fetching it
/// safe_fetch validate https://example.com/article
///
/// # Fetch a URL and write the body to a file
/// safe_fetch fetch https://example.com/article --output article.html
///
/// # Run the ingest front end
/// safe_fetch serve --bind 0.0.0.0:8000
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "safe_fetch",
    about = "Validates and fetches user-supplied URLs without exposing internal networks."
)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// DNS backend: system|hickory
    #[arg(long, value_enum, default_value_t = ResolverBackend::System, global = true)]
    pub resolver: ResolverBackend,

    /// DNS resolution deadline in milliseconds
    #[arg(long, default_value_t = 5000, global = true)]
    pub dns_timeout_ms: u64,

    /// TCP/TLS connect timeout in seconds
    #[arg(long, default_value_t = 5, global = true)]
    pub connect_timeout_secs: u64,

    /// Response read timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub read_timeout_secs: u64,

    /// Maximum number of redirects to follow
    #[arg(long, default_value_t = MAX_REDIRECT_HOPS, global = true)]
    pub max_redirects: usize,

    /// Maximum response body size in bytes
    #[arg(long, default_value_t = MAX_RESPONSE_BODY_SIZE, global = true)]
    pub max_body_bytes: usize,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    pub user_agent: String,

    /// Permit loopback targets (local development only)
    #[arg(long, global = true)]
    pub allow_loopback: bool,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether a URL is safe to contact, without fetching it
    Validate {
        /// URL to validate
        url: String,
    },
    /// Fetch a URL, revalidating every redirect hop
    Fetch {
        /// URL to fetch
        url: String,

        /// Write the body here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Serve the ingest HTTP front end
    Serve {
        /// Address to listen on
        #[arg(long, default_value = DEFAULT_BIND_ADDR)]
        bind: SocketAddr,
    },
}

impl Cli {
    /// Builds the library configuration from the parsed flags.
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            dns_timeout: Duration::from_millis(self.dns_timeout_ms),
            dns_workers: DNS_WORKERS,
            resolver: self.resolver,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.read_timeout_secs),
            max_redirects: self.max_redirects,
            max_body_bytes: self.max_body_bytes,
            user_agent: self.user_agent.clone(),
            policy: if self.allow_loopback {
                Policy::AllowLoopback
            } else {
                Policy::PublicOnly
            },
        }
    }
}
