//! Session behavior tests against scripted in-memory providers.

use std::future::Future;

use draft_session::DraftSession;
use draft_types::{
    CompletionRequest, IssueDraft, Message, Provider, StreamEvent, StreamHandle, TransportError,
};
use futures::{stream, StreamExt};

/// Provider that replays a scripted sequence of stream events.
struct ScriptedProvider {
    events: Vec<StreamEvent>,
}

impl Provider for ScriptedProvider {
    fn complete(
        &self,
        _request: CompletionRequest,
    ) -> impl Future<Output = Result<String, TransportError>> + Send {
        let text: String = self
            .events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::TextDelta(t) => Some(t.as_str()),
                StreamEvent::Error(_) => None,
            })
            .collect();
        async move { Ok(text) }
    }

    fn complete_stream(
        &self,
        _request: CompletionRequest,
    ) -> impl Future<Output = Result<StreamHandle, TransportError>> + Send {
        let events = self.events.clone();
        async move {
            Ok(StreamHandle {
                receiver: Box::pin(stream::iter(events)),
            })
        }
    }
}

/// Provider whose stream never ends after the scripted prefix; the only
/// way out is cancellation.
struct StallingProvider {
    prefix: Vec<StreamEvent>,
}

impl Provider for StallingProvider {
    fn complete(
        &self,
        _request: CompletionRequest,
    ) -> impl Future<Output = Result<String, TransportError>> + Send {
        async { Ok(String::new()) }
    }

    fn complete_stream(
        &self,
        _request: CompletionRequest,
    ) -> impl Future<Output = Result<StreamHandle, TransportError>> + Send {
        let prefix = self.prefix.clone();
        async move {
            Ok(StreamHandle {
                receiver: Box::pin(stream::iter(prefix).chain(stream::pending())),
            })
        }
    }
}

/// Provider that fails before any stream opens.
struct FailingProvider;

impl Provider for FailingProvider {
    fn complete(
        &self,
        _request: CompletionRequest,
    ) -> impl Future<Output = Result<String, TransportError>> + Send {
        async { Err(TransportError::ServiceUnavailable("overloaded".into())) }
    }

    fn complete_stream(
        &self,
        _request: CompletionRequest,
    ) -> impl Future<Output = Result<StreamHandle, TransportError>> + Send {
        async { Err(TransportError::ServiceUnavailable("overloaded".into())) }
    }
}

fn delta(text: &str) -> StreamEvent {
    StreamEvent::TextDelta(text.into())
}

fn request() -> CompletionRequest {
    CompletionRequest {
        model: String::new(),
        messages: vec![Message::user("generate issues")],
        temperature: None,
    }
}

fn draft_sink() -> (
    impl FnMut(IssueDraft) + Send + 'static,
    tokio::sync::mpsc::UnboundedReceiver<IssueDraft>,
) {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    (
        move |draft| {
            let _ = tx.send(draft);
        },
        rx,
    )
}

#[tokio::test]
async fn drafts_reach_sink_in_order_and_session_settles() {
    let provider = ScriptedProvider {
        events: vec![
            delta("<IssueTitle>Fix "),
            delta("login</IssueTitle><Issue"),
            delta("Text>Timeout is 5s.</IssueText><IssueTitle>Add retry"),
            delta("</IssueTitle><IssueText>Backoff on 429.</IssueText>"),
        ],
    };

    let session = DraftSession::new();
    let (sink, mut rx) = draft_sink();
    session.start(provider, request(), sink).await.unwrap();

    assert!(!session.is_processing());
    assert!(session.last_error().is_none());

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(first.title, "Fix login");
    assert_eq!(first.body, "Timeout is 5s.");
    assert_eq!(second.title, "Add retry");
    assert_eq!(second.body, "Backoff on 429.");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn transport_error_is_recorded_but_emitted_drafts_stay() {
    let provider = ScriptedProvider {
        events: vec![
            delta("<IssueTitle>A</IssueTitle><IssueText>b</IssueText>"),
            StreamEvent::Error("connection reset".into()),
        ],
    };

    let session = DraftSession::new();
    let (sink, mut rx) = draft_sink();
    session.start(provider, request(), sink).await.unwrap();

    assert!(!session.is_processing());
    let err = session.last_error().unwrap();
    assert_eq!(err, TransportError::Stream("connection reset".into()));

    assert_eq!(rx.recv().await.unwrap().title, "A");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn failure_before_stream_opens_records_error_and_no_drafts() {
    let session = DraftSession::new();
    let (sink, mut rx) = draft_sink();
    session.start(FailingProvider, request(), sink).await.unwrap();

    assert!(!session.is_processing());
    assert!(matches!(
        session.last_error(),
        Some(TransportError::ServiceUnavailable(_))
    ));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn cancellation_is_silent_and_keeps_delivered_drafts() {
    let provider = StallingProvider {
        prefix: vec![delta(
            "<IssueTitle>A</IssueTitle><IssueText>b</IssueText><IssueTitle>part",
        )],
    };

    let session = DraftSession::new();
    let (sink, mut rx) = draft_sink();
    let handle = session.start(provider, request(), sink);

    // Wait for the first draft so we know the run is mid-stream.
    let first = rx.recv().await.unwrap();
    assert_eq!(first.title, "A");
    assert!(session.is_processing());

    session.cancel();
    handle.await.unwrap();

    assert!(!session.is_processing());
    assert!(session.last_error().is_none());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn truncated_stream_drops_partial_region_silently() {
    let provider = ScriptedProvider {
        events: vec![delta("<IssueTitle>Dangling<IssueText>never closed")],
    };

    let session = DraftSession::new();
    let (sink, mut rx) = draft_sink();
    session.start(provider, request(), sink).await.unwrap();

    assert!(!session.is_processing());
    assert!(session.last_error().is_none());
    assert!(rx.try_recv().is_err());
}
