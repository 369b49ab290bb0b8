//! OpenRouter API client struct and builder.

use std::future::Future;

use draft_types::{CompletionRequest, Provider, StreamHandle, TransportError};

use crate::error::{map_http_status, map_reqwest_error};
use crate::streaming::stream_completion;

/// Default model used when none is specified on the request.
const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet:beta";

/// Default OpenRouter API base URL.
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api";

/// Default sampling temperature used when the request does not specify one.
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Client for the OpenRouter chat-completions API.
///
/// Implements [`Provider`] for use anywhere a provider is accepted.
///
/// # Example
///
/// ```no_run
/// use draft_provider_openrouter::OpenRouter;
///
/// let client = OpenRouter::new("sk-or-...")
///     .model("anthropic/claude-3.5-sonnet:beta")
///     .referer("https://issues.example.com")
///     .app_title("Issue Generator");
/// ```
pub struct OpenRouter {
    /// OpenRouter API key.
    pub(crate) api_key: String,
    /// Default model identifier used when the request does not specify one.
    pub(crate) model: String,
    /// API base URL (override for testing or proxies).
    pub(crate) base_url: String,
    /// Optional `HTTP-Referer` attribution header.
    pub(crate) referer: Option<String>,
    /// Optional `X-Title` attribution header.
    pub(crate) app_title: Option<String>,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl OpenRouter {
    /// Create a new client with the given API key and sensible defaults.
    ///
    /// Default model: `anthropic/claude-3.5-sonnet:beta`.
    /// Default base URL: `https://openrouter.ai/api`.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            referer: None,
            app_title: None,
            client: reqwest::Client::new(),
        }
    }

    /// Override the default model.
    ///
    /// This is used when [`CompletionRequest::model`] is empty.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL.
    ///
    /// Useful for testing with a local mock server or an API proxy.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the `HTTP-Referer` attribution header sent on every request.
    #[must_use]
    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Set the `X-Title` attribution header sent on every request.
    #[must_use]
    pub fn app_title(mut self, title: impl Into<String>) -> Self {
        self.app_title = Some(title.into());
        self
    }

    /// Build the chat completions endpoint URL.
    pub(crate) fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Map a [`CompletionRequest`] to the chat-completions JSON body.
    pub(crate) fn request_body(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> serde_json::Value {
        let model = if request.model.is_empty() {
            &self.model
        } else {
            &request.model
        };
        serde_json::json!({
            "model": model,
            "messages": request.messages,
            "stream": stream,
            "temperature": request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        })
    }

    /// Build the POST with auth and attribution headers applied.
    fn post(&self, url: &str, body: &serde_json::Value) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body);
        if let Some(referer) = &self.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.app_title {
            builder = builder.header("X-Title", title);
        }
        builder
    }
}

impl Provider for OpenRouter {
    /// Send a completion request and return the full response text.
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<String, TransportError>> + Send {
        let url = self.completions_url();
        let body = self.request_body(&request, false);
        let dispatch = self.post(&url, &body);

        async move {
            tracing::debug!(url = %url, model = %body["model"], "sending completion request");

            let response = dispatch.send().await.map_err(map_reqwest_error)?;

            let status = response.status();
            let response_text = response.text().await.map_err(map_reqwest_error)?;

            if !status.is_success() {
                return Err(map_http_status(status, &response_text));
            }

            let json: serde_json::Value = serde_json::from_str(&response_text)
                .map_err(|e| TransportError::InvalidRequest(format!("invalid JSON response: {e}")))?;

            json["choices"][0]["message"]["content"]
                .as_str()
                .map(ToOwned::to_owned)
                .ok_or_else(|| {
                    TransportError::InvalidRequest("response has no message content".into())
                })
        }
    }

    /// Send a streaming completion request.
    ///
    /// Returns a [`StreamHandle`] whose receiver emits [`StreamEvent`]s as
    /// the model generates content.
    ///
    /// [`StreamEvent`]: draft_types::StreamEvent
    fn complete_stream(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<StreamHandle, TransportError>> + Send {
        let url = self.completions_url();
        let body = self.request_body(&request, true);
        let dispatch = self.post(&url, &body);

        async move {
            tracing::debug!(url = %url, model = %body["model"], "sending streaming completion request");

            let response = dispatch.send().await.map_err(map_reqwest_error)?;

            let status = response.status();
            if !status.is_success() {
                let body_text = response.text().await.map_err(map_reqwest_error)?;
                return Err(map_http_status(status, &body_text));
            }

            Ok(stream_completion(response))
        }
    }
}
