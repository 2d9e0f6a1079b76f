//! Error type definitions.
//!
//! This module defines the errors raised by validation and resolution, the
//! reasons a fetch can end without content, and initialization failures.

use std::net::IpAddr;
use std::time::Duration;

use log::SetLoggerError;
use thiserror::Error;

use crate::config::{EXIT_REJECTED, EXIT_UNAVAILABLE};
use crate::security::UnsafeRange;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Broad category of a [`FetchError`].
///
/// Callers branch on this instead of matching every variant: rejections map to a
/// client error (400), transient failures to "content unavailable" (422).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The URL itself is unacceptable: bad syntax, scheme, host, or address.
    SecurityRejection,
    /// Name resolution did not produce a usable answer.
    TransientFailure,
}

/// Errors raised by URL validation, DNS resolution, and fetching.
///
/// Ordinary transport failures are not errors; see [`UnavailableReason`].
#[derive(Error, Debug)]
pub enum FetchError {
    /// The input URL could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// Input as given
        url: String,
        /// Parser message
        reason: String,
    },

    /// Scheme other than `http` or `https`.
    #[error("Unsupported scheme '{scheme}' (only http and https allowed): {url}")]
    UnsupportedScheme {
        /// Offending URL
        url: String,
        /// Scheme that was refused
        scheme: String,
    },

    /// The URL has no host component.
    #[error("No hostname in URL: {url}")]
    NoHostname {
        /// Offending URL
        url: String,
    },

    /// A literal or resolved address is not globally routable.
    #[error("Unsafe address for {host}: {ip} is {range}")]
    UnsafeAddress {
        /// Host as written in the URL
        host: String,
        /// First address that failed the check
        ip: IpAddr,
        /// Range the address falls in
        range: UnsafeRange,
    },

    /// DNS lookup exceeded its deadline.
    #[error("DNS resolution timed out for {host} after {}ms", .timeout.as_millis())]
    ResolutionTimeout {
        /// Host being resolved
        host: String,
        /// Deadline that expired
        timeout: Duration,
    },

    /// The resolver reported an error.
    #[error("DNS resolution failed for {host}: {message}")]
    ResolutionFailed {
        /// Host being resolved
        host: String,
        /// Resolver message
        message: String,
    },

    /// The resolver answered with no addresses.
    #[error("No addresses found for {host}")]
    NoAddresses {
        /// Host being resolved
        host: String,
    },
}

impl FetchError {
    pub(crate) fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn unsafe_address(host: impl Into<String>, ip: IpAddr, range: UnsafeRange) -> Self {
        Self::UnsafeAddress {
            host: host.into(),
            ip,
            range,
        }
    }

    /// Returns the broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::InvalidUrl { .. }
            | FetchError::UnsupportedScheme { .. }
            | FetchError::NoHostname { .. }
            | FetchError::UnsafeAddress { .. } => ErrorKind::SecurityRejection,
            FetchError::ResolutionTimeout { .. }
            | FetchError::ResolutionFailed { .. }
            | FetchError::NoAddresses { .. } => ErrorKind::TransientFailure,
        }
    }

    /// True for rejections of the URL itself (see [`ErrorKind::SecurityRejection`]).
    pub fn is_security_rejection(&self) -> bool {
        self.kind() == ErrorKind::SecurityRejection
    }

    /// Process exit code the CLI uses for this error.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::SecurityRejection => EXIT_REJECTED,
            ErrorKind::TransientFailure => EXIT_UNAVAILABLE,
        }
    }
}

/// Why a fetch ended without content.
///
/// These are ordinary outcomes ("the remote content is unavailable"), never
/// security rejections, and are returned inside `Ok`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// Connect, TLS, or read failure.
    #[error("Transport error for {url}: {message}")]
    Transport {
        /// URL of the failed request
        url: String,
        /// Transport error message
        message: String,
    },

    /// Final response was neither 200 nor a redirect.
    #[error("HTTP status {status} for {url}")]
    Status {
        /// URL that answered
        url: String,
        /// Status code received
        status: u16,
    },

    /// Redirect response without a usable Location header.
    #[error("Redirect status {status} for {url} without Location header")]
    MissingLocation {
        /// URL that answered with the redirect
        url: String,
        /// Redirect status code
        status: u16,
    },

    /// Redirect whose Location header cannot be turned into a URL.
    #[error("Redirect status {status} for {url} has unusable Location '{location}': {reason}")]
    InvalidLocation {
        /// URL that answered with the redirect
        url: String,
        /// Redirect status code
        status: u16,
        /// Raw header value
        location: String,
        /// Parser message
        reason: String,
    },

    /// The redirect chain was longer than allowed.
    #[error("Too many redirects (max {max})")]
    TooManyRedirects {
        /// Configured redirect limit
        max: usize,
    },

    /// Body exceeded the configured size limit.
    #[error("Response body for {url} exceeds {limit} bytes")]
    BodyTooLarge {
        /// URL whose body was cut off
        url: String,
        /// Configured limit in bytes
        limit: usize,
    },
}
