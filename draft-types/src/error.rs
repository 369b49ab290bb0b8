//! Error types for all draft-blocks crates.

use std::time::Duration;

/// Errors from the transport layer (HTTP dispatch or stream read).
///
/// Payloads are plain strings so a recorded error can be cloned out of a
/// session without keeping the underlying source alive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    // Retryable errors
    /// Network-level error (connection reset, DNS failure, etc.).
    #[error("network error: {0}")]
    Network(String),
    /// Rate limited by the provider.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimit {
        /// Suggested retry delay, if provided by the API.
        retry_after: Option<Duration>,
    },
    /// Request timed out.
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    /// Provider service is temporarily unavailable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    // Terminal errors
    /// Authentication/authorization failure.
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// Malformed or invalid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Error while reading the response stream.
    #[error("stream error: {0}")]
    Stream(String),
}

impl TransportError {
    /// Whether this error is likely transient and the request can be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::RateLimit { .. } | Self::Timeout(_) | Self::ServiceUnavailable(_)
        )
    }
}

/// Errors from single-shot extraction over a complete input.
///
/// Only the batch variant produces these; incremental extraction drops an
/// unterminated trailing region silently when the stream ends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// An opening delimiter has no matching closing delimiter anywhere in
    /// the input.
    #[error("unterminated <{tag}> opened at byte {offset}")]
    UnterminatedTag {
        /// The tag name of the unclosed region.
        tag: &'static str,
        /// Byte offset of the opening delimiter in the unconsumed input.
        offset: usize,
    },
}
