//! Redirect bookkeeping.
//!
//! The fetch loop follows redirects itself so every hop can be revalidated.
//! This module decides whether a response is a redirect and where it points.

use reqwest::header::LOCATION;
use serde::Serialize;
use url::Url;

use crate::config::REDIRECT_STATUSES;

/// One followed redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectHop {
    /// Zero-based position in the chain
    pub index: usize,
    /// URL that answered with the redirect
    pub url: String,
    /// Redirect status code
    pub status: u16,
    /// Raw `Location` header value
    pub location: Option<String>,
}

/// Returns true for the statuses the fetch loop follows (301, 302, 303, 307, 308).
pub(crate) fn is_redirect_status(status: u16) -> bool {
    REDIRECT_STATUSES.contains(&status)
}

/// Reads the `Location` header. Absent or non-ASCII values count as missing.
pub(crate) fn location_header(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Resolves a `Location` value against the URL that returned it.
///
/// The result still has to pass validation before it is fetched; this only
/// turns the header into an absolute URL.
pub(crate) fn resolve_location(current: &Url, location: &str) -> Result<Url, url::ParseError> {
    current.join(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_redirect_status() {
        for status in [301, 302, 303, 307, 308] {
            assert!(is_redirect_status(status), "{} should redirect", status);
        }
        for status in [200, 204, 300, 304, 305, 306, 400, 404, 500] {
            assert!(!is_redirect_status(status), "{} should not redirect", status);
        }
    }

    #[test]
    fn test_resolve_relative_location() {
        let current = Url::parse("https://example.com/articles/one?x=1").expect("valid url");

        let next = resolve_location(&current, "/articles/two").expect("should join");
        assert_eq!(next.as_str(), "https://example.com/articles/two");

        let next = resolve_location(&current, "three").expect("should join");
        assert_eq!(next.as_str(), "https://example.com/articles/three");
    }

    #[test]
    fn test_resolve_protocol_relative_location() {
        // A scheme-relative Location can move the fetch to another host entirely
        let current = Url::parse("https://example.com/").expect("valid url");
        let next = resolve_location(&current, "//169.254.169.254/latest").expect("should join");
        assert_eq!(next.host_str(), Some("169.254.169.254"));
        assert_eq!(next.scheme(), "https");
    }

    #[test]
    fn test_resolve_absolute_location() {
        let current = Url::parse("https://example.com/").expect("valid url");
        let next = resolve_location(&current, "http://10.0.0.1/admin").expect("should join");
        assert_eq!(next.as_str(), "http://10.0.0.1/admin");
    }

    #[test]
    fn test_resolve_invalid_location() {
        let current = Url::parse("https://example.com/").expect("valid url");
        let result = resolve_location(&current, "http://[::1");
        assert_eq!(result, Err(url::ParseError::InvalidIpv6Address));
    }
}
