//! URL validation and SSRF protection.
//!
//! A URL is safe to fetch when:
//! - it parses and uses the `http` or `https` scheme
//! - it has a host
//! - every address the host stands for is acceptable under the validator's
//!   [`Policy`]: the literal itself for IP hosts, every resolved address for
//!   domain hosts
//!
//! One unsafe answer in a mixed DNS response rejects the whole host. Nothing is
//! cached, so the same URL validated twice is resolved twice.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use log::{debug, warn};
use url::{Host, ParseError, Url};

use super::classifier::Policy;
use crate::dns::{BoundedResolver, ResolvedAddress};
use crate::error_handling::FetchError;

/// A URL that passed validation.
///
/// Holds the caller's string exactly as given alongside its parsed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeUrl {
    original: String,
    url: Url,
}

impl SafeUrl {
    /// The URL exactly as it was passed to [`UrlValidator::validate`].
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// The parsed URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the input string, unchanged.
    pub fn into_string(self) -> String {
        self.original
    }
}

impl fmt::Display for SafeUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Everything needed to open one connection safely.
///
/// `ip` comes from the same resolution that produced `addresses`, all of which
/// were checked. For IP-literal hosts `addresses` holds just the literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTarget {
    /// The URL being fetched
    pub url: Url,
    /// Hostname as it appears in the URL (brackets included for IPv6)
    pub host: String,
    /// Address to connect to
    pub ip: IpAddr,
    /// Port to connect to (explicit or scheme default)
    pub port: u16,
    /// Every address the host resolved to, in resolver order
    pub addresses: Vec<ResolvedAddress>,
    domain: bool,
}

impl ValidatedTarget {
    /// True if the host is a domain name rather than an IP literal.
    pub fn is_domain(&self) -> bool {
        self.domain
    }
}

/// Validates URLs against a [`Policy`], resolving hostnames through a shared
/// [`BoundedResolver`].
#[derive(Debug, Clone)]
pub struct UrlValidator {
    resolver: Arc<BoundedResolver>,
    policy: Policy,
}

impl UrlValidator {
    /// Creates a validator that only accepts globally routable addresses.
    pub fn new(resolver: Arc<BoundedResolver>) -> Self {
        Self::with_policy(resolver, Policy::PublicOnly)
    }

    /// Creates a validator that applies `policy` to every address.
    pub fn with_policy(resolver: Arc<BoundedResolver>, policy: Policy) -> Self {
        Self { resolver, policy }
    }

    /// Address policy in force.
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Shared resolver pool.
    pub fn resolver(&self) -> &Arc<BoundedResolver> {
        &self.resolver
    }

    /// Validates `url`, returning it unchanged if it is safe to fetch.
    ///
    /// # Errors
    ///
    /// - `InvalidUrl`, `UnsupportedScheme`, `NoHostname` for malformed input
    /// - `UnsafeAddress` if the host is, or resolves to, an unacceptable address
    /// - `ResolutionTimeout`, `ResolutionFailed`, `NoAddresses` if the host
    ///   could not be resolved
    pub async fn validate(&self, url: &str) -> Result<SafeUrl, FetchError> {
        let parsed = parse_url(url)?;
        self.validate_target(&parsed).await?;
        Ok(SafeUrl {
            original: url.to_string(),
            url: parsed,
        })
    }

    /// Validates an already parsed URL for one fetch hop.
    ///
    /// Resolves the host once and returns the address to connect to along with
    /// everything that was checked.
    pub async fn validate_target(&self, url: &Url) -> Result<ValidatedTarget, FetchError> {
        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(FetchError::UnsupportedScheme {
                url: url.to_string(),
                scheme: scheme.to_string(),
            });
        }

        let host = match url.host() {
            Some(host) => host,
            None => {
                return Err(FetchError::NoHostname {
                    url: url.to_string(),
                })
            }
        };
        let host_str = url.host_str().unwrap_or_default().to_string();
        let port = url
            .port_or_known_default()
            .unwrap_or(if scheme == "https" { 443 } else { 80 });

        let (addresses, domain) = match host {
            Host::Ipv4(ip) => (vec![ResolvedAddress::from(IpAddr::V4(ip))], false),
            Host::Ipv6(ip) => (vec![ResolvedAddress::from(IpAddr::V6(ip))], false),
            Host::Domain(domain) => (self.resolver.resolve(domain).await?, true),
        };

        // Check every answer before picking one to connect to
        for address in &addresses {
            if let Err(range) = self.policy.check(address.ip) {
                warn!(
                    "Blocked {}: host {} maps to {} ({})",
                    url, host_str, address.ip, range
                );
                return Err(FetchError::unsafe_address(&host_str, address.ip, range));
            }
        }

        let ip = match addresses.first() {
            Some(address) => address.ip,
            None => return Err(FetchError::NoAddresses { host: host_str }),
        };

        debug!("Validated {} -> {}:{}", url, ip, port);
        Ok(ValidatedTarget {
            url: url.clone(),
            host: host_str,
            ip,
            port,
            addresses,
            domain,
        })
    }
}

/// Parses a URL, mapping an empty host to `NoHostname`.
pub(crate) fn parse_url(url: &str) -> Result<Url, FetchError> {
    Url::parse(url).map_err(|e| match e {
        ParseError::EmptyHost => FetchError::NoHostname {
            url: url.to_string(),
        },
        other => FetchError::invalid_url(url, other),
    })
}
