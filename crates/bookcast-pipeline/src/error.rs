//! Pipeline error types.

use bookcast_format::FormatError;
use bookcast_monitor::FatalCondition;
use bookcast_publish::PublishError;
use thiserror::Error;

/// Failure of one market's cycle pass.
///
/// `Fatal` is the only variant that escapes the orchestrator's per-market
/// boundary; the rest are logged and absorbed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fatal(#[from] FatalCondition),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}
