#![doc = include_str!("../README.md")]

pub mod client;
pub(crate) mod error;
pub(crate) mod streaming;

pub use client::OpenRouter;

// Re-export draft-types for convenience
pub use draft_types::{Provider, StreamEvent, StreamHandle, TransportError};
