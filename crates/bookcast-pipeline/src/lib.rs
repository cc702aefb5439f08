//! Per-market pipeline and refresh-cycle orchestration.
//!
//! The embedding process wires a [`BookSource`] (the upstream order-book
//! aggregator) and a `SnapshotSink` (the pub/sub transport plus latest-value
//! store), then drives [`Orchestrator::run`]. One full pass over the
//! configured markets runs per refresh cycle; per-market failures are
//! absorbed and logged, and only the two consistency kill-switch conditions
//! escape, as a [`FatalCondition`](bookcast_monitor::FatalCondition) handed
//! to [`exit_on_fatal`].

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod source;

pub use config::{AppConfig, ConfigError, MarketEntry};
pub use error::PipelineError;
pub use orchestrator::{exit_on_fatal, CycleReport, Orchestrator};
pub use pipeline::{MarketOutcome, MarketPipeline};
pub use source::{BookSource, StaticBookSource};
