//! Core domain types for the bookcast snapshot publisher.
//!
//! This crate provides the fundamental types used throughout the pipeline:
//! - `MarketKey`: unique identifier for published markets (type + index)
//! - `Price`, `Size`: precision-safe numeric types
//! - `RawBook`, `BookUpdate`: the per-cycle input the upstream aggregator hands over
//! - `MarketPublishConfig`: immutable per-market publication settings

pub mod book;
pub mod decimal;
pub mod error;
pub mod market;

pub use book::{BookUpdate, OracleInfo, PriceLevel, RawBook};
pub use decimal::{Price, Size};
pub use error::{CoreError, Result};
pub use market::{MarketDescriptor, MarketKey, MarketPublishConfig, MarketType, PublishMode};
