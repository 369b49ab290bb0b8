//! SSE streaming support for the OpenRouter chat-completions API.
//!
//! Decodes the Server-Sent Events stream into [`StreamEvent`]s carrying the
//! incremental text deltas.
//!
//! The wire format is the OpenAI-compatible one:
//! ```text
//! data: {"id":"...","choices":[{"delta":{"content":"text"}}]}
//!
//! data: [DONE]
//! ```

use draft_types::{StreamEvent, StreamHandle};
use futures::{Stream, StreamExt};
use reqwest::Response;

/// Wrap an HTTP response body into a [`StreamHandle`] that emits [`StreamEvent`]s.
///
/// The response body is consumed as a byte stream; partial SSE lines are
/// carried across chunks.
pub(crate) fn stream_completion(response: Response) -> StreamHandle {
    let byte_stream = response.bytes_stream();
    let event_stream = decode_sse_stream(byte_stream);
    StreamHandle {
        receiver: Box::pin(event_stream),
    }
}

/// Decode a raw byte stream into a stream of [`StreamEvent`]s.
///
/// The stream completes when the underlying byte stream ends. A read or
/// UTF-8 failure yields one `Error` event and ends the stream.
fn decode_sse_stream(
    byte_stream: impl Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
) -> impl Stream<Item = StreamEvent> + Send + 'static {
    async_stream::stream! {
        let mut decoder = SseDecoder::new();
        let mut bytes_stream = std::pin::pin!(byte_stream);
        let mut line_buf = String::new();

        while let Some(chunk_result) = bytes_stream.next().await {
            let chunk = match chunk_result {
                Ok(b) => b,
                Err(e) => {
                    yield StreamEvent::Error(format!("stream read error: {e}"));
                    return;
                }
            };

            let chunk_str = match std::str::from_utf8(&chunk) {
                Ok(s) => s,
                Err(e) => {
                    yield StreamEvent::Error(format!("UTF-8 decode error: {e}"));
                    return;
                }
            };

            // Append chunk to our line buffer and process complete lines
            line_buf.push_str(chunk_str);

            // Split by newlines, keeping any incomplete line for the next chunk
            while let Some(newline_pos) = line_buf.find('\n') {
                let line = line_buf[..newline_pos].trim_end_matches('\r').to_string();
                line_buf.drain(..=newline_pos);

                for event in decoder.process_line(&line) {
                    yield event;
                }
            }
        }

        // Process any remaining content in the buffer
        if !line_buf.trim().is_empty() {
            for event in decoder.process_line(line_buf.trim()) {
                yield event;
            }
        }

        // A final data line with no trailing blank separator still dispatches
        for event in decoder.flush() {
            yield event;
        }
    }
}

/// Accumulates `data:` payloads across SSE lines and dispatches them on the
/// blank-line separator.
struct SseDecoder {
    /// The current SSE data (from `data:` lines; may be multi-line).
    data_buf: String,
}

impl SseDecoder {
    fn new() -> Self {
        Self {
            data_buf: String::new(),
        }
    }

    /// Process one SSE line and return any events it produces.
    fn process_line(&mut self, line: &str) -> Vec<StreamEvent> {
        if line.is_empty() {
            // Blank line: dispatch the accumulated data
            return self.dispatch_data();
        }

        if let Some(data) = line.strip_prefix("data: ") {
            if !self.data_buf.is_empty() {
                self.data_buf.push('\n');
            }
            self.data_buf.push_str(data);
        }
        // `event:` lines and comment lines (starting with ':') are not part
        // of this wire format and are ignored.

        vec![]
    }

    /// Dispatch any pending payload at end-of-stream.
    fn flush(&mut self) -> Vec<StreamEvent> {
        self.dispatch_data()
    }

    /// Dispatch the accumulated payload, returning produced [`StreamEvent`]s.
    fn dispatch_data(&mut self) -> Vec<StreamEvent> {
        let data = std::mem::take(&mut self.data_buf);

        if data.is_empty() || data == "[DONE]" {
            return vec![];
        }

        let json: serde_json::Value = match serde_json::from_str(&data) {
            Ok(v) => v,
            Err(e) => {
                // Undecodable payloads are skipped, never fatal: later valid
                // frames must keep producing deltas.
                tracing::warn!(error = %e, "skipping undecodable SSE payload");
                return vec![];
            }
        };

        // A structurally valid error object is a genuine stream error
        if let Some(error) = json.get("error") {
            let msg = error["message"]
                .as_str()
                .unwrap_or("unknown streaming error")
                .to_string();
            return vec![StreamEvent::Error(msg)];
        }

        match json["choices"][0]["delta"]["content"].as_str() {
            Some(content) if !content.is_empty() => {
                vec![StreamEvent::TextDelta(content.to_string())]
            }
            _ => vec![],
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
