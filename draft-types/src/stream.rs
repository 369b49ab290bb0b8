//! Streaming event types for incremental model responses.

use std::pin::Pin;

use futures::Stream;

/// An event emitted while decoding a streaming completion response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental text content.
    TextDelta(String),
    /// The stream failed mid-read. The stream ends after this event.
    Error(String),
}

/// Handle to a streaming completion response.
///
/// Dropping the handle releases the underlying connection.
pub struct StreamHandle {
    /// The stream of events. Consume with `StreamExt::next()`.
    pub receiver: Pin<Box<dyn Stream<Item = StreamEvent> + Send>>,
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}
