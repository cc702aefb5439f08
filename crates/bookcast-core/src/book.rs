//! Raw order-book input types.
//!
//! A `BookUpdate` is what the upstream aggregation engine hands the pipeline
//! for one market on one refresh cycle. It is owned transiently and never
//! retained across cycles.

use crate::{Price, Size};
use serde::{Deserialize, Serialize};

/// A single ladder level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Price,
    pub size: Size,
}

impl PriceLevel {
    pub fn new(price: Price, size: Size) -> Self {
        Self { price, size }
    }
}

/// Raw L2 snapshot as assembled upstream.
///
/// Bids are ordered highest to lowest, asks lowest to highest. `slot` is the
/// book's own logical clock, distinct from the market slot carried on
/// [`BookUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBook {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
    pub slot: u64,
}

impl RawBook {
    pub fn new(bids: Vec<PriceLevel>, asks: Vec<PriceLevel>, slot: u64) -> Self {
        Self { bids, asks, slot }
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

/// Reference-price data from the oracle reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleInfo {
    pub price: Price,
    /// Slot at which the oracle last reported for this market.
    pub slot: u64,
    pub confidence: Size,
}

impl OracleInfo {
    pub fn new(price: Price, slot: u64, confidence: Size) -> Self {
        Self {
            price,
            slot,
            confidence,
        }
    }
}

/// Complete per-market input for one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookUpdate {
    pub book: RawBook,
    pub oracle: OracleInfo,
    /// Metadata-derived logical clock for the market. Advances when the
    /// market's on-chain account state changes; not the book slot.
    pub market_slot: u64,
}

impl BookUpdate {
    pub fn new(book: RawBook, oracle: OracleInfo, market_slot: u64) -> Self {
        Self {
            book,
            oracle,
            market_slot,
        }
    }
}
