//! Core draft and chat request types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A structured issue draft extracted from a model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueDraft {
    /// Process-unique identifier, assigned at extraction time.
    pub id: String,
    /// Issue title, trimmed of surrounding whitespace.
    pub title: String,
    /// Issue body, trimmed of surrounding whitespace. May be empty.
    pub body: String,
    /// When this draft was extracted.
    pub created_at: DateTime<Utc>,
}

impl IssueDraft {
    /// Create a new draft with a fresh id and the current timestamp.
    ///
    /// # Example
    ///
    /// ```
    /// use draft_types::IssueDraft;
    /// let draft = IssueDraft::new("Fix login timeout", "Sessions expire after 5s.");
    /// assert_eq!(draft.title, "Fix login timeout");
    /// ```
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}

/// The role of a message participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A human user.
    User,
    /// An AI assistant.
    Assistant,
    /// A system message.
    System,
}

/// A chat message sent to the completions endpoint.
///
/// Content is a plain string, the chat-completions wire format, not a
/// block list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message author.
    pub role: Role,
    /// The text content of this message.
    pub content: String,
}

impl Message {
    /// Create a user message.
    ///
    /// # Example
    ///
    /// ```
    /// use draft_types::Message;
    /// let msg = Message::user("Our login page times out constantly.");
    /// ```
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }

    /// Create a system message.
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
        }
    }
}

/// A completion request to a chat-completions endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model identifier. Empty means the provider's default.
    pub model: String,
    /// The conversation messages.
    pub messages: Vec<Message>,
    /// Sampling temperature. `None` means the provider's default.
    pub temperature: Option<f32>,
}
