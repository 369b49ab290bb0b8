//! Core traits: the provider seam between transport and extraction.

use std::future::Future;

use crate::error::TransportError;
use crate::stream::StreamHandle;
use crate::types::CompletionRequest;

/// Chat-completions provider trait. Implement this for each backend.
///
/// Uses RPITIT (return position impl trait in trait), Rust 2024 native
/// async. Not object-safe by design; use generics `<P: Provider>` to
/// compose.
///
/// # Example
///
/// ```ignore
/// struct MyProvider;
///
/// impl Provider for MyProvider {
///     fn complete(&self, request: CompletionRequest)
///         -> impl Future<Output = Result<String, TransportError>> + Send
///     {
///         async { todo!() }
///     }
///
///     fn complete_stream(&self, request: CompletionRequest)
///         -> impl Future<Output = Result<StreamHandle, TransportError>> + Send
///     {
///         async { todo!() }
///     }
/// }
/// ```
pub trait Provider: Send + Sync {
    /// Send a completion request and get the full response text.
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;

    /// Send a completion request and get a stream of events.
    fn complete_stream(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<StreamHandle, TransportError>> + Send;
}
