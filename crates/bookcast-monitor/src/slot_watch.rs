//! Consistency kill-switch state machine.
//!
//! Two independent fatal checks run per cycle, per market:
//!
//! 1. Book/oracle divergence: the book's slot and the oracle's slot must
//!    stay within a configured distance. A large gap means the book is being
//!    built from state far from the oracle's view of the chain, and serving
//!    it is worse than serving nothing.
//! 2. Market-slot staleness: each market's metadata logical clock must keep
//!    moving. A clock frozen beyond its class window while snapshots still
//!    arrive means the market state itself has stopped updating.
//!
//! Violations are returned as `FatalCondition` values. Nothing in this
//! module exits the process; the orchestrator owns that single call site, so
//! the kill decision stays testable.

use bookcast_core::{MarketKey, MarketType};
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default book/oracle slot divergence limit.
pub const DEFAULT_SLOT_DIFF_THRESHOLD: u64 = 200;

/// A condition that must terminate the whole process.
///
/// Recovery is restart, owned by the external supervisor. One market
/// tripping either check kills the process as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalCondition {
    #[error(
        "book/oracle slot divergence on {market}: book={book_slot} oracle={oracle_slot} (limit {threshold})"
    )]
    SlotDivergence {
        market: MarketKey,
        book_slot: u64,
        oracle_slot: u64,
        threshold: u64,
    },

    #[error(
        "market slot frozen on {market}: slot={market_slot} unchanged for {frozen_ms}ms (window {window_ms}ms)"
    )]
    FrozenMarketSlot {
        market: MarketKey,
        market_slot: u64,
        frozen_ms: i64,
        window_ms: u64,
    },
}

/// Staleness windows per market class, in milliseconds.
///
/// The two values are independent configuration; no ordering between the
/// classes is assumed anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StalenessWindows {
    /// Spot-market window. Default: 20 minutes.
    #[serde(default = "default_spot_window_ms")]
    pub spot_ms: u64,
    /// Perp-market window. Default: 10 minutes.
    #[serde(default = "default_perp_window_ms")]
    pub perp_ms: u64,
}

fn default_spot_window_ms() -> u64 {
    1_200_000
}

fn default_perp_window_ms() -> u64 {
    600_000
}

impl Default for StalenessWindows {
    fn default() -> Self {
        Self {
            spot_ms: default_spot_window_ms(),
            perp_ms: default_perp_window_ms(),
        }
    }
}

impl StalenessWindows {
    #[must_use]
    pub fn for_market(&self, market_type: MarketType) -> u64 {
        match market_type {
            MarketType::Spot => self.spot_ms,
            MarketType::Perp => self.perp_ms,
        }
    }
}

/// Per-market logical clock state.
///
/// `changed_at` advances only when the slot value actually changes; it is a
/// last-changed timestamp, not a last-seen timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotState {
    pub last_market_slot: u64,
    pub changed_at: DateTime<Utc>,
}

/// Kill-switch monitor holding the per-market state table.
///
/// Entries are independently lockable DashMap shards; each market's entry is
/// only touched by that market's cycle pass.
#[derive(Debug)]
pub struct SlotMonitor {
    slot_diff_threshold: u64,
    windows: StalenessWindows,
    states: DashMap<MarketKey, SlotState>,
}

impl Default for SlotMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_SLOT_DIFF_THRESHOLD, StalenessWindows::default())
    }
}

impl SlotMonitor {
    #[must_use]
    pub fn new(slot_diff_threshold: u64, windows: StalenessWindows) -> Self {
        Self {
            slot_diff_threshold,
            windows,
            states: DashMap::new(),
        }
    }

    /// Check the book's slot against the oracle's.
    ///
    /// Fatal when the absolute difference exceeds the configured threshold;
    /// a difference of exactly the threshold passes.
    pub fn check_divergence(
        &self,
        market: MarketKey,
        book_slot: u64,
        oracle_slot: u64,
    ) -> Result<(), FatalCondition> {
        let diff = book_slot.abs_diff(oracle_slot);
        if diff > self.slot_diff_threshold {
            return Err(FatalCondition::SlotDivergence {
                market,
                book_slot,
                oracle_slot,
                threshold: self.slot_diff_threshold,
            });
        }
        Ok(())
    }

    /// Record this cycle's market slot and check for a frozen clock.
    ///
    /// First observation seeds the state and never trips. Afterwards, an
    /// unchanged slot older than the class window is fatal; a changed slot
    /// refreshes both the stored value and its timestamp.
    pub fn observe_market_slot(
        &self,
        market: MarketKey,
        market_slot: u64,
    ) -> Result<(), FatalCondition> {
        self.observe_market_slot_at(market, market_slot, Utc::now())
    }

    /// Clock-injectable form of [`observe_market_slot`](Self::observe_market_slot).
    pub fn observe_market_slot_at(
        &self,
        market: MarketKey,
        market_slot: u64,
        now: DateTime<Utc>,
    ) -> Result<(), FatalCondition> {
        match self.states.entry(market) {
            Entry::Vacant(vacant) => {
                debug!(market = %market, market_slot, "seeding market slot state");
                vacant.insert(SlotState {
                    last_market_slot: market_slot,
                    changed_at: now,
                });
                Ok(())
            }
            Entry::Occupied(mut occupied) => {
                let state = occupied.get_mut();
                if state.last_market_slot == market_slot {
                    let frozen_ms = (now - state.changed_at).num_milliseconds();
                    let window_ms = self.windows.for_market(market.market_type);
                    if frozen_ms > window_ms as i64 {
                        return Err(FatalCondition::FrozenMarketSlot {
                            market,
                            market_slot,
                            frozen_ms,
                            window_ms,
                        });
                    }
                } else {
                    state.last_market_slot = market_slot;
                    state.changed_at = now;
                }
                Ok(())
            }
        }
    }

    /// Milliseconds since the market's slot last changed, if observed.
    #[must_use]
    pub fn market_slot_age_ms(&self, market: &MarketKey) -> Option<i64> {
        self.states
            .get(market)
            .map(|state| (Utc::now() - state.changed_at).num_milliseconds())
    }

    /// Current slot state for a market, if observed.
    #[must_use]
    pub fn state(&self, market: &MarketKey) -> Option<SlotState> {
        self.states.get(market).map(|state| *state)
    }

    /// Number of markets being watched.
    #[must_use]
    pub fn market_count(&self) -> usize {
        self.states.len()
    }
}
