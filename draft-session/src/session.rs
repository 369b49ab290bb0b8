//! Session lifecycle for one streaming draft-generation run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use draft_extract::DraftExtractor;
use draft_types::{CompletionRequest, IssueDraft, Provider, StreamEvent, TransportError};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Observable handle for one streaming draft-generation run.
///
/// Cheap to clone and share with an observing layer; all state lives behind
/// an `Arc`. The session itself holds no drafts; completed drafts go to
/// the sink passed to [`start`](DraftSession::start).
#[derive(Clone, Default)]
pub struct DraftSession {
    inner: Arc<SessionInner>,
}

#[derive(Default)]
struct SessionInner {
    processing: AtomicBool,
    error: Mutex<Option<TransportError>>,
    cancel: Mutex<Option<CancellationToken>>,
}

/// How a pipeline run ended.
enum Outcome {
    /// The stream completed normally.
    Finished,
    /// Cancellation was requested; not an error.
    Cancelled,
    /// The transport failed before or during the stream.
    Failed(TransportError),
}

impl DraftSession {
    /// Create an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a streaming run is currently in flight.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.inner.processing.load(Ordering::SeqCst)
    }

    /// The error that ended the last run, if any.
    ///
    /// Cancellation never records an error.
    #[must_use]
    pub fn last_error(&self) -> Option<TransportError> {
        lock(&self.inner.error).clone()
    }

    /// Request cooperative cancellation of the in-flight run.
    ///
    /// The pipeline stops at its next suspension point and releases the
    /// connection. No error is recorded; drafts already delivered to the
    /// sink stay delivered.
    pub fn cancel(&self) {
        if let Some(token) = lock(&self.inner.cancel).take() {
            token.cancel();
        }
    }

    /// Start a streaming run, delivering each completed draft to `sink`.
    ///
    /// Returns immediately; observe progress through
    /// [`is_processing`](Self::is_processing) and
    /// [`last_error`](Self::last_error), or await the returned handle.
    ///
    /// One run at a time: the session does not guard against overlapping
    /// runs. Callers must let a run finish (or cancel it) before starting
    /// the next.
    pub fn start<P, F>(&self, provider: P, request: CompletionRequest, sink: F) -> JoinHandle<()>
    where
        P: Provider + 'static,
        F: FnMut(IssueDraft) + Send + 'static,
    {
        let token = CancellationToken::new();
        *lock(&self.inner.cancel) = Some(token.clone());
        *lock(&self.inner.error) = None;
        self.inner.processing.store(true, Ordering::SeqCst);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            match run_pipeline(&provider, request, &token, sink).await {
                Outcome::Finished => {}
                Outcome::Cancelled => tracing::debug!("draft stream cancelled"),
                Outcome::Failed(err) => {
                    tracing::warn!(error = %err, "draft stream failed");
                    *lock(&inner.error) = Some(err);
                }
            }
            inner.processing.store(false, Ordering::SeqCst);
            lock(&inner.cancel).take();
        })
    }
}

/// Drive decode and extraction until the stream ends, fails, or is
/// cancelled.
///
/// Both suspension points (opening the stream, awaiting the next event)
/// race the cancellation token. Dropping the stream handle on any exit
/// path releases the connection.
async fn run_pipeline<P, F>(
    provider: &P,
    request: CompletionRequest,
    token: &CancellationToken,
    mut sink: F,
) -> Outcome
where
    P: Provider,
    F: FnMut(IssueDraft),
{
    let handle = tokio::select! {
        () = token.cancelled() => return Outcome::Cancelled,
        result = provider.complete_stream(request) => match result {
            Ok(handle) => handle,
            Err(err) => return Outcome::Failed(err),
        },
    };

    let mut extractor = DraftExtractor::new();
    let mut stream = handle.receiver;

    loop {
        let event = tokio::select! {
            () = token.cancelled() => return Outcome::Cancelled,
            event = stream.next() => match event {
                Some(event) => event,
                None => break,
            },
        };

        match event {
            StreamEvent::TextDelta(delta) => {
                for draft in extractor.push(&delta) {
                    sink(draft);
                }
            }
            StreamEvent::Error(msg) => return Outcome::Failed(TransportError::Stream(msg)),
        }
    }

    // Whatever the extractor still holds is an unterminated trailing
    // region; streaming mode drops it.
    Outcome::Finished
}

/// Lock, recovering from poisoning. The guarded state is plain data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
