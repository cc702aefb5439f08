//! Upstream book source seam.

use bookcast_core::{BookUpdate, MarketKey, MarketPublishConfig};
use dashmap::DashMap;

/// The order-book aggregation engine, as the pipeline sees it.
///
/// Once per cycle the orchestrator asks for each configured market's latest
/// assembled update. Implementations honor the market's secondary-liquidity
/// settings (`include_secondary_liquidity`, `secondary_order_cap`,
/// `fallback_liquidity_sources`) when building the ladder; returning `None`
/// skips the market for this cycle without error.
pub trait BookSource: Send + Sync {
    fn latest(&self, config: &MarketPublishConfig) -> Option<BookUpdate>;
}

/// Table-backed source for in-process handoff.
///
/// The aggregator task inserts each market's freshest update; the pipeline
/// reads it on its next pass. Also the standard test double.
#[derive(Debug, Default)]
pub struct StaticBookSource {
    updates: DashMap<MarketKey, BookUpdate>,
}

impl StaticBookSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, market: MarketKey, update: BookUpdate) {
        self.updates.insert(market, update);
    }

    pub fn remove(&self, market: &MarketKey) {
        self.updates.remove(market);
    }
}

impl BookSource for StaticBookSource {
    fn latest(&self, config: &MarketPublishConfig) -> Option<BookUpdate> {
        self.updates.get(&config.key()).map(|u| u.value().clone())
    }
}
