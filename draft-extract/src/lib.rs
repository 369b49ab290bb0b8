#![doc = include_str!("../README.md")]

pub mod batch;
pub mod extractor;

pub use batch::extract_all;
pub use extractor::DraftExtractor;
