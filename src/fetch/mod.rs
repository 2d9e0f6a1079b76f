//! Direct-connect fetching.
//!
//! [`Fetcher::fetch`] drives the redirect loop. On every hop it:
//! 1. validates the current URL, resolving its host exactly once
//! 2. connects to one of the addresses that were just checked (never to the
//!    hostname, so a second lookup by the HTTP stack cannot be rebound)
//! 3. follows redirects manually, revalidating the new target from scratch
//!
//! Security problems come back as `Err(FetchError)`. A remote that simply does
//! not deliver (connection refused, 404, too many redirects) comes back as
//! `Ok(FetchOutcome::Unavailable)`.

mod redirects;
mod request;
mod response;

use std::sync::Arc;

use log::{debug, info};
use serde::Serialize;

use crate::config::FetchConfig;
use crate::dns::BoundedResolver;
use crate::error_handling::{FetchError, UnavailableReason};
use crate::security::{parse_url, SafeUrl, UrlValidator};

pub use redirects::RedirectHop;

use redirects::{is_redirect_status, location_header, resolve_location};
use request::send_pinned;
use response::read_body_limited;

/// A successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchedPage {
    /// Decoded body (invalid UTF-8 replaced with U+FFFD)
    pub body: String,
    /// URL of the response that produced `body`
    pub final_url: String,
    /// Redirects followed to get there, in order
    pub redirects: Vec<RedirectHop>,
}

/// Result of a fetch that was not rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was retrieved.
    Fetched(FetchedPage),
    /// The remote did not deliver content. Not a security event.
    Unavailable(UnavailableReason),
}

impl FetchOutcome {
    /// True if a page was retrieved.
    pub fn is_fetched(&self) -> bool {
        matches!(self, FetchOutcome::Fetched(_))
    }

    /// The fetched page, if any.
    pub fn page(&self) -> Option<&FetchedPage> {
        match self {
            FetchOutcome::Fetched(page) => Some(page),
            FetchOutcome::Unavailable(_) => None,
        }
    }

    /// The body text, or `None` if the content was unavailable.
    pub fn into_body(self) -> Option<String> {
        match self {
            FetchOutcome::Fetched(page) => Some(page.body),
            FetchOutcome::Unavailable(_) => None,
        }
    }
}

/// SSRF-safe HTTP fetcher.
///
/// Cheap to clone; clones share the resolver pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    validator: UrlValidator,
    config: Arc<FetchConfig>,
}

impl Fetcher {
    /// Creates a fetcher with its own resolver built from `config`.
    pub fn new(config: FetchConfig) -> Self {
        let resolver = Arc::new(BoundedResolver::from_config(&config));
        Self::with_resolver(config, resolver)
    }

    /// Creates a fetcher that shares an existing resolver (and its worker pool).
    pub fn with_resolver(config: FetchConfig, resolver: Arc<BoundedResolver>) -> Self {
        let validator = UrlValidator::with_policy(resolver, config.policy);
        Self {
            validator,
            config: Arc::new(config),
        }
    }

    /// Configuration this fetcher was built with.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Validator used on every hop.
    pub fn validator(&self) -> &UrlValidator {
        &self.validator
    }

    /// Validates `url` without fetching it. See [`UrlValidator::validate`].
    pub async fn validate(&self, url: &str) -> Result<SafeUrl, FetchError> {
        self.validator.validate(url).await
    }

    /// Fetches `url`, following up to `max_redirects` redirects.
    ///
    /// # Errors
    ///
    /// Any hop failing validation (including a redirect into a private range)
    /// or resolution aborts the fetch with that error. `InvalidUrl` only ever
    /// describes `url` itself; a `Location` header that cannot be turned into
    /// a URL ends the fetch as `Unavailable(InvalidLocation)`.
    pub async fn fetch(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        let max_redirects = self.config.max_redirects;
        let mut current = parse_url(url)?;
        let mut redirects: Vec<RedirectHop> = Vec::new();

        for hop in 0..=max_redirects {
            // Fresh resolution and validation on every hop
            let target = self.validator.validate_target(&current).await?;

            let response = match send_pinned(&target, &self.config).await {
                Ok(response) => response,
                Err(e) => {
                    info!("Fetch of {} via {} failed: {}", current, target.ip, e);
                    return Ok(FetchOutcome::Unavailable(UnavailableReason::Transport {
                        url: current.to_string(),
                        message: e.to_string(),
                    }));
                }
            };

            let status = response.status().as_u16();

            if is_redirect_status(status) {
                if hop == max_redirects {
                    break;
                }
                let Some(location) = location_header(&response) else {
                    info!("Redirect status {} for {} without Location header", status, current);
                    return Ok(FetchOutcome::Unavailable(UnavailableReason::MissingLocation {
                        url: current.to_string(),
                        status,
                    }));
                };
                let next = match resolve_location(&current, &location) {
                    Ok(next) => next,
                    Err(e) => {
                        info!("Redirect from {} has unusable Location '{}': {}", current, location, e);
                        return Ok(FetchOutcome::Unavailable(UnavailableReason::InvalidLocation {
                            url: current.to_string(),
                            status,
                            location,
                            reason: e.to_string(),
                        }));
                    }
                };
                debug!("Hop {}: {} {} -> {}", hop, status, current, next);
                redirects.push(RedirectHop {
                    index: hop,
                    url: current.to_string(),
                    status,
                    location: Some(location),
                });
                current = next;
                continue;
            }

            if status != 200 {
                info!("Fetch of {} returned HTTP {}", current, status);
                return Ok(FetchOutcome::Unavailable(UnavailableReason::Status {
                    url: current.to_string(),
                    status,
                }));
            }

            return match read_body_limited(response, &current, self.config.max_body_bytes).await {
                Ok(body) => {
                    debug!(
                        "Fetched {} ({} bytes, {} redirects)",
                        current,
                        body.len(),
                        redirects.len()
                    );
                    Ok(FetchOutcome::Fetched(FetchedPage {
                        body,
                        final_url: current.to_string(),
                        redirects,
                    }))
                }
                Err(reason) => {
                    info!("Reading body of {} failed: {}", current, reason);
                    Ok(FetchOutcome::Unavailable(reason))
                }
            };
        }

        info!("Giving up on {} after {} redirects", url, max_redirects);
        Ok(FetchOutcome::Unavailable(
            UnavailableReason::TooManyRedirects { max: max_redirects },
        ))
    }
}
