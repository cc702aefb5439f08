//! Snapshot sink seam and fan-out publisher.
//!
//! The pub/sub transport and latest-value store are external collaborators;
//! this crate pins down the interface the pipeline needs from them
//! (`SnapshotSink`) and implements the fan-out of one enriched snapshot to
//! its channel and latest-value keys.

pub mod error;
pub mod memory;
pub mod publisher;
pub mod sink;

pub use error::{PublishError, PublishResult, SinkError, SinkResult};
pub use memory::MemorySink;
pub use publisher::{Publisher, DEPTH_CUTS};
pub use sink::SnapshotSink;
