#![doc = include_str!("../README.md")]

pub mod session;

pub use session::DraftSession;

// Re-export draft-types for convenience
pub use draft_types::{CompletionRequest, IssueDraft, Provider, TransportError};
