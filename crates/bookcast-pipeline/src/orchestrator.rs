//! Refresh-cycle orchestration.

use crate::config::{AppConfig, ConfigError};
use crate::error::PipelineError;
use crate::pipeline::{MarketOutcome, MarketPipeline};
use crate::source::BookSource;
use bookcast_core::MarketPublishConfig;
use bookcast_monitor::{FatalCondition, SlotMonitor};
use bookcast_publish::{Publisher, SnapshotSink};
use bookcast_telemetry::Metrics;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Outcome counts for one full market pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub published: usize,
    pub suppressed: usize,
    /// Markets with no upstream update this cycle.
    pub skipped: usize,
    /// Markets whose pass failed recoverably.
    pub failed: usize,
}

/// Drives one pipeline pass per refresh cycle over all configured markets.
///
/// Per-market failures are absorbed here so one market's error never stops
/// the others; only a [`FatalCondition`] ends the run.
pub struct Orchestrator<S> {
    markets: Vec<MarketPublishConfig>,
    pipeline: MarketPipeline<S>,
    refresh_interval: Duration,
}

impl<S: SnapshotSink> Orchestrator<S> {
    pub fn new(config: &AppConfig, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let monitor = SlotMonitor::new(config.kill_switch_slot_diff_threshold, config.staleness);
        Ok(Self {
            markets: config.publish_configs(),
            pipeline: MarketPipeline::new(monitor, Publisher::new(sink)),
            refresh_interval: Duration::from_millis(config.refresh_interval_ms),
        })
    }

    pub fn pipeline(&self) -> &MarketPipeline<S> {
        &self.pipeline
    }

    pub fn market_count(&self) -> usize {
        self.markets.len()
    }

    /// One full pass over the configured markets.
    pub async fn run_cycle<B: BookSource + ?Sized>(
        &self,
        source: &B,
    ) -> Result<CycleReport, FatalCondition> {
        let started = Instant::now();
        let mut report = CycleReport::default();

        for config in &self.markets {
            let market = config.key();
            let Some(update) = source.latest(config) else {
                debug!(market = %market, "no update this cycle");
                report.skipped += 1;
                continue;
            };

            match self.pipeline.process(config, &update).await {
                Ok(MarketOutcome::Published) => {
                    Metrics::snapshot_published(&market.to_string());
                    report.published += 1;
                }
                Ok(MarketOutcome::Suppressed) => {
                    Metrics::snapshot_suppressed(&market.to_string());
                    report.suppressed += 1;
                }
                Err(PipelineError::Fatal(fatal)) => {
                    error!(market = %market, condition = %fatal, "kill switch tripped");
                    return Err(fatal);
                }
                Err(err) => {
                    warn!(market = %market, error = %err, "market cycle failed");
                    Metrics::market_error(&market.to_string());
                    report.failed += 1;
                }
            }
        }

        Metrics::cycle_duration_ms(started.elapsed().as_secs_f64() * 1_000.0);
        debug!(
            published = report.published,
            suppressed = report.suppressed,
            skipped = report.skipped,
            failed = report.failed,
            "cycle complete"
        );
        Ok(report)
    }

    /// Run cycles on the configured cadence until a fatal condition occurs.
    pub async fn run<B: BookSource + ?Sized>(&self, source: &B) -> FatalCondition {
        let mut ticker = tokio::time::interval(self.refresh_interval);
        loop {
            ticker.tick().await;
            if let Err(fatal) = self.run_cycle(source).await {
                return fatal;
            }
        }
    }
}

/// The single process-termination point for kill-switch conditions.
///
/// Everything up to here returns the condition as a value; the embedding
/// binary calls this once, after which the external supervisor owns restart.
pub fn exit_on_fatal(fatal: &FatalCondition) -> ! {
    error!(condition = %fatal, "terminating: consistency kill switch");
    std::process::exit(1);
}
