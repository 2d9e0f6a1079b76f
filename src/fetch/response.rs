//! Reading response bodies.

use log::debug;
use url::Url;

use crate::error_handling::UnavailableReason;

/// Reads the body of a 200 response, stopping once it exceeds `limit` bytes.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than failing
/// the fetch.
pub(crate) async fn read_body_limited(
    mut response: reqwest::Response,
    url: &Url,
    limit: usize,
) -> Result<String, UnavailableReason> {
    let too_large = || UnavailableReason::BodyTooLarge {
        url: url.to_string(),
        limit,
    };

    if let Some(length) = response.content_length() {
        if length > limit as u64 {
            debug!("Content-Length {} for {} exceeds {}", length, url, limit);
            return Err(too_large());
        }
    }

    let mut body: Vec<u8> = Vec::new();
    loop {
        let chunk = response
            .chunk()
            .await
            .map_err(|e| UnavailableReason::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        let Some(chunk) = chunk else { break };
        if body.len() + chunk.len() > limit {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }

    Ok(decode_body(&body))
}

pub(crate) fn decode_body(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
