//! Per-market publication gating on ladder content.

use bookcast_core::{MarketKey, PublishMode};
use dashmap::DashMap;
use tracing::trace;

/// Tracks the digest of the last published ladder per market.
///
/// Thread-safe via DashMap; each market's entry is touched only by that
/// market's cycle pass.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    digests: DashMap<MarketKey, String>,
}

impl ChangeDetector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            digests: DashMap::new(),
        }
    }

    /// Decide whether this cycle's snapshot goes out.
    ///
    /// `Always` markets publish every cycle. `OnChange` markets publish only
    /// when `digest` differs from the stored one (a market with no stored
    /// digest always publishes). On any `true` decision the stored digest is
    /// updated immediately, whether or not the downstream write later
    /// succeeds; suppression is best-effort, not transactional.
    pub fn should_publish(&self, market: MarketKey, mode: PublishMode, digest: &str) -> bool {
        match mode {
            PublishMode::Always => {
                self.digests.insert(market, digest.to_owned());
                true
            }
            PublishMode::OnChange => {
                let changed = self
                    .digests
                    .get(&market)
                    .map(|stored| stored.as_str() != digest)
                    .unwrap_or(true);
                if changed {
                    self.digests.insert(market, digest.to_owned());
                } else {
                    trace!(market = %market, "ladder unchanged, suppressing publish");
                }
                changed
            }
        }
    }

    /// Number of markets with a stored digest.
    #[must_use]
    pub fn market_count(&self) -> usize {
        self.digests.len()
    }
}
