//! Internal error helpers for mapping HTTP/reqwest errors to [`TransportError`].

use std::time::Duration;

use draft_types::TransportError;

/// Map an HTTP status code (from the OpenRouter API) to a [`TransportError`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> TransportError {
    match status.as_u16() {
        401 | 403 => TransportError::Authentication(body.to_string()),
        400 => TransportError::InvalidRequest(body.to_string()),
        // 429 may include a Retry-After header; callers with header access
        // can construct RateLimit with a delay directly.
        429 => TransportError::RateLimit { retry_after: None },
        500..=599 => TransportError::ServiceUnavailable(body.to_string()),
        _ => TransportError::InvalidRequest(format!("HTTP {status}: {body}")),
    }
}

/// Map a [`reqwest::Error`] to a [`TransportError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        // Generic 30-second duration; the configured timeout is not tracked here
        TransportError::Timeout(Duration::from_secs(30))
    } else {
        TransportError::Network(err.to_string())
    }
}
