//! Crate-wide error type.
//!
//! Gesture rejection and prompt cancellation are not errors; they are ordinary
//! outcomes of the workflow. Everything here is a collaborator failure that the
//! core propagates to its caller without retrying.

use crate::doc::ImageId;

/// Errors surfaced by the tagger core and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("tagged image not found: {0}")]
    NotFound(ImageId),
    #[error("tag index {index} out of range for {len} tags")]
    TagIndexOutOfRange { index: usize, len: usize },
    #[error("invalid data url: {0}")]
    InvalidDataUrl(String),
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("storage quota exceeded writing {0}")]
    QuotaExceeded(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("drawing surface error: {0}")]
    Surface(String),
    #[error("dom error: {0}")]
    Dom(String),
    #[error("invalid config: {0}")]
    Config(String),
}

/// Shorthand for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
