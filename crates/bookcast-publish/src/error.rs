//! Publish and sink error types.

use thiserror::Error;

/// Transport-level sink failure.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Sink connection closed: {0}")]
    Closed(String),

    #[error("Sink backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SinkResult<T> = Result<T, SinkError>;

/// Publisher failure surfaced to the caller.
///
/// Sink write failures are absorbed and logged per destination; only payload
/// encoding failures propagate.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Payload encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type PublishResult<T> = Result<T, PublishError>;
