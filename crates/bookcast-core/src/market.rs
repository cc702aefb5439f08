//! Market identification and publication settings.
//!
//! Every published market is identified by its type (spot or perpetual)
//! plus its index in that listing. The pair also determines the pub/sub
//! channel and latest-value store keys a market's snapshots land on.

use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Market class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    Spot,
    Perp,
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spot => write!(f, "spot"),
            Self::Perp => write!(f, "perp"),
        }
    }
}

/// Unique market identifier combining market type and listing index.
///
/// This is the primary key for all per-market state in the pipeline.
/// Format: `{type}:{index}` (e.g., "perp:3").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketKey {
    pub market_type: MarketType,
    pub index: u32,
}

impl MarketKey {
    pub fn new(market_type: MarketType, index: u32) -> Self {
        Self { market_type, index }
    }

    pub fn spot(index: u32) -> Self {
        Self::new(MarketType::Spot, index)
    }

    pub fn perp(index: u32) -> Self {
        Self::new(MarketType::Perp, index)
    }

    /// Pub/sub channel this market's snapshots are published on.
    pub fn channel(&self) -> String {
        format!("orderbook_{}_{}", self.market_type, self.index)
    }

    /// Latest-value store key for the full snapshot.
    pub fn store_key(&self) -> String {
        format!("last_update_orderbook_{}_{}", self.market_type, self.index)
    }

    /// Latest-value store key for a depth-truncated snapshot.
    pub fn depth_store_key(&self, depth: usize) -> String {
        format!("{}_depth_{}", self.store_key(), depth)
    }
}

impl fmt::Display for MarketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.market_type, self.index)
    }
}

impl FromStr for MarketKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (market_type, index) = s
            .split_once(':')
            .ok_or_else(|| CoreError::InvalidMarketKey(s.to_string()))?;
        let market_type = match market_type {
            "spot" => MarketType::Spot,
            "perp" => MarketType::Perp,
            _ => return Err(CoreError::InvalidMarketKey(s.to_string())),
        };
        let index = index
            .parse()
            .map_err(|_| CoreError::InvalidMarketKey(s.to_string()))?;
        Ok(Self { market_type, index })
    }
}

/// Static market metadata, supplied at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketDescriptor {
    pub key: MarketKey,
    /// Display name (e.g., "SOL-PERP").
    pub name: String,
}

impl MarketDescriptor {
    pub fn new(key: MarketKey, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
        }
    }
}

/// When a market's snapshot is pushed downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishMode {
    /// Publish every cycle, identical or not.
    Always,
    /// Publish only when the formatted ladder differs from the last publish.
    #[default]
    OnChange,
}

/// Immutable per-market publication settings, built once at startup.
///
/// The secondary-liquidity fields are consumed by the upstream aggregator
/// when it assembles the raw ladder; they ride along here because this is
/// the single per-market configuration record.
#[derive(Debug, Clone)]
pub struct MarketPublishConfig {
    pub descriptor: MarketDescriptor,
    /// Levels kept per side after grouping. Negative means unlimited.
    pub depth: i64,
    /// Merge a synthetic secondary liquidity source into the ladder upstream.
    pub include_secondary_liquidity: bool,
    /// Cap on synthetic orders taken from the secondary source.
    pub secondary_order_cap: Option<usize>,
    /// Ordered fallback liquidity generator handles, applied upstream.
    pub fallback_liquidity_sources: Vec<String>,
    /// Price bucket for grouped ladders. None publishes raw levels.
    pub grouping: Option<Decimal>,
    pub publish_mode: PublishMode,
}

impl MarketPublishConfig {
    /// Plain configuration: full depth, no grouping, publish on change.
    pub fn new(descriptor: MarketDescriptor) -> Self {
        Self {
            descriptor,
            depth: -1,
            include_secondary_liquidity: false,
            secondary_order_cap: None,
            fallback_liquidity_sources: Vec::new(),
            grouping: None,
            publish_mode: PublishMode::default(),
        }
    }

    pub fn key(&self) -> MarketKey {
        self.descriptor.key
    }
}
