//! Fan-out of one enriched snapshot to its channel and store keys.

use crate::error::PublishResult;
use crate::sink::SnapshotSink;
use bookcast_core::MarketDescriptor;
use bookcast_format::BookPayload;
use bookcast_telemetry::Metrics;
use tracing::warn;

/// Depth cuts written alongside the full snapshot, deepest first.
pub const DEPTH_CUTS: [usize; 3] = [100, 20, 5];

/// Writes snapshots to the sink.
///
/// Destinations are independent: a failed write to one is logged with market
/// context and the remaining destinations still go out. Retry policy belongs
/// to the sink or an external supervisor, not here.
#[derive(Debug)]
pub struct Publisher<S> {
    sink: S,
}

impl<S: SnapshotSink> Publisher<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Emit the full snapshot on the market's channel, then write the full
    /// and depth-truncated copies to their latest-value keys.
    pub async fn publish_all(
        &self,
        market: &MarketDescriptor,
        payload: &BookPayload,
    ) -> PublishResult<()> {
        let key = market.key;
        let encoded = serde_json::to_string(payload)?;

        if let Err(e) = self.sink.publish(&key.channel(), &encoded).await {
            warn!(market = %key, error = %e, "channel publish failed");
            Metrics::sink_error(&key.to_string(), "channel");
        }
        if let Err(e) = self.sink.set(&key.store_key(), &encoded).await {
            warn!(market = %key, error = %e, "full snapshot store write failed");
            Metrics::sink_error(&key.to_string(), "store");
        }

        for depth in DEPTH_CUTS {
            let truncated = serde_json::to_string(&payload.truncated(depth))?;
            if let Err(e) = self.sink.set(&key.depth_store_key(depth), &truncated).await {
                warn!(market = %key, depth, error = %e, "depth snapshot store write failed");
                Metrics::sink_error(&key.to_string(), "store");
            }
        }

        Ok(())
    }
}
