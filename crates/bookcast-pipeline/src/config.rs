//! Application configuration.

use bookcast_core::{
    MarketDescriptor, MarketKey, MarketPublishConfig, MarketType, PublishMode,
};
use bookcast_monitor::{StalenessWindows, DEFAULT_SLOT_DIFF_THRESHOLD};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// One market's publication settings as configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketEntry {
    pub market_index: u32,
    pub market_type: MarketType,
    /// Display name (e.g., "SOL-PERP").
    pub name: String,
    /// Levels kept per side. Negative means unlimited.
    #[serde(default = "default_depth")]
    pub depth: i64,
    /// Price bucket for grouped ladders. Must be positive when set.
    #[serde(default)]
    pub grouping: Option<u32>,
    /// Merge the synthetic secondary liquidity source upstream.
    #[serde(default)]
    pub include_secondary_liquidity: bool,
    /// Cap on synthetic orders taken from the secondary source.
    #[serde(default)]
    pub secondary_order_cap: Option<usize>,
    /// Ordered fallback liquidity generator handles, applied upstream.
    #[serde(default)]
    pub fallback_liquidity_sources: Vec<String>,
    #[serde(default)]
    pub publish_mode: PublishMode,
}

fn default_depth() -> i64 {
    -1
}

impl MarketEntry {
    pub fn key(&self) -> MarketKey {
        MarketKey::new(self.market_type, self.market_index)
    }

    fn to_publish_config(&self) -> MarketPublishConfig {
        MarketPublishConfig {
            descriptor: MarketDescriptor::new(self.key(), self.name.clone()),
            depth: self.depth,
            include_secondary_liquidity: self.include_secondary_liquidity,
            secondary_order_cap: self.secondary_order_cap,
            fallback_liquidity_sources: self.fallback_liquidity_sources.clone(),
            grouping: self.grouping.map(Decimal::from),
            publish_mode: self.publish_mode,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upstream refresh cadence driving the cycle loop (ms).
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    /// Book/oracle slot divergence limit for the kill switch.
    #[serde(default = "default_slot_diff_threshold")]
    pub kill_switch_slot_diff_threshold: u64,
    /// Market-slot staleness windows per market class.
    #[serde(default)]
    pub staleness: StalenessWindows,
    /// Markets to publish.
    #[serde(default)]
    pub markets: Vec<MarketEntry>,
}

fn default_refresh_interval_ms() -> u64 {
    1_000
}

fn default_slot_diff_threshold() -> u64 {
    DEFAULT_SLOT_DIFF_THRESHOLD
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            kill_switch_slot_diff_threshold: default_slot_diff_threshold(),
            staleness: StalenessWindows::default(),
            markets: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the path in `BOOKCAST_CONFIG`, falling back
    /// to `config/default.toml`, falling back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("BOOKCAST_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot be published safely.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "refresh_interval_ms must be positive".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for entry in &self.markets {
            if !seen.insert(entry.key()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate market {}",
                    entry.key()
                )));
            }
            if entry.name.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "market {} has an empty name",
                    entry.key()
                )));
            }
            if entry.grouping == Some(0) {
                return Err(ConfigError::Invalid(format!(
                    "market {} has zero grouping",
                    entry.key()
                )));
            }
        }
        Ok(())
    }

    /// Immutable per-market publication configs for the orchestrator.
    pub fn publish_configs(&self) -> Vec<MarketPublishConfig> {
        self.markets
            .iter()
            .map(MarketEntry::to_publish_config)
            .collect()
    }
}
