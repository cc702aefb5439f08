//! Prometheus metrics and structured logging for bookcast.
//!
//! - Prometheus metrics for publication volume, suppression, sink errors,
//!   cycle latency, and slot health
//! - Structured JSON logging with tracing

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
