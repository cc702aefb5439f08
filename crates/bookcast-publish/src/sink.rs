//! The downstream sink interface.

use crate::error::SinkResult;
use std::future::Future;
use std::sync::Arc;

/// Pub/sub transport plus latest-value store, as the pipeline sees them.
///
/// Implementations must tolerate concurrent use. Delivery semantics are the
/// sink's own: the pipeline treats it as a reliable at-least-once target and
/// never retries here.
pub trait SnapshotSink: Send + Sync {
    /// Publish `payload` on a pub/sub channel.
    fn publish(&self, channel: &str, payload: &str)
        -> impl Future<Output = SinkResult<()>> + Send;

    /// Overwrite the latest value stored under `key`.
    fn set(&self, key: &str, payload: &str) -> impl Future<Output = SinkResult<()>> + Send;
}

impl<S: SnapshotSink + ?Sized> SnapshotSink for Arc<S> {
    fn publish(
        &self,
        channel: &str,
        payload: &str,
    ) -> impl Future<Output = SinkResult<()>> + Send {
        (**self).publish(channel, payload)
    }

    fn set(&self, key: &str, payload: &str) -> impl Future<Output = SinkResult<()>> + Send {
        (**self).set(key, payload)
    }
}
