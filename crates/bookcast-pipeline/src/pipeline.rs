//! One market's cycle pass.
//!
//! Order of operations per update: format the ladder, check book/oracle slot
//! divergence, assemble the enriched payload, gate on change detection,
//! publish, then record the market slot and check it for freezing. The
//! divergence check runs before the gate so a diverged market kills the
//! process even when its ladder is unchanged, and the slot observation runs
//! after publication so both kill checks are evaluated every cycle whether
//! or not anything went out.

use crate::error::PipelineError;
use bookcast_core::{BookUpdate, MarketPublishConfig};
use bookcast_format::{format_book, BookPayload};
use bookcast_monitor::{ChangeDetector, SlotMonitor};
use bookcast_publish::{Publisher, SnapshotSink};
use bookcast_telemetry::Metrics;

/// What a successful cycle pass did for a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketOutcome {
    Published,
    Suppressed,
}

/// The per-market processing stages, wired once at startup.
#[derive(Debug)]
pub struct MarketPipeline<S> {
    monitor: SlotMonitor,
    changes: ChangeDetector,
    publisher: Publisher<S>,
}

impl<S: SnapshotSink> MarketPipeline<S> {
    pub fn new(monitor: SlotMonitor, publisher: Publisher<S>) -> Self {
        Self {
            monitor,
            changes: ChangeDetector::new(),
            publisher,
        }
    }

    pub fn monitor(&self) -> &SlotMonitor {
        &self.monitor
    }

    pub fn publisher(&self) -> &Publisher<S> {
        &self.publisher
    }

    /// Run one market through the full pipeline.
    pub async fn process(
        &self,
        config: &MarketPublishConfig,
        update: &BookUpdate,
    ) -> Result<MarketOutcome, PipelineError> {
        let market = config.key();
        let market_label = market.to_string();
        let book_slot = update.book.slot;

        let formatted = format_book(&update.book, config.grouping, config.depth)?;

        Metrics::slot_divergence(&market_label, book_slot.abs_diff(update.oracle.slot) as f64);
        self.monitor
            .check_divergence(market, book_slot, update.oracle.slot)?;

        let digest = formatted.digest();
        let payload = BookPayload::builder(&config.descriptor, formatted)
            .book_slot(book_slot)
            .oracle(&update.oracle)
            .market_slot(update.market_slot)
            .build();

        let outcome = if self
            .changes
            .should_publish(market, config.publish_mode, &digest)
        {
            self.publisher
                .publish_all(&config.descriptor, &payload)
                .await?;
            MarketOutcome::Published
        } else {
            MarketOutcome::Suppressed
        };

        self.monitor
            .observe_market_slot(market, update.market_slot)?;
        if let Some(age_ms) = self.monitor.market_slot_age_ms(&market) {
            Metrics::market_slot_age(&market_label, age_ms as f64);
        }

        Ok(outcome)
    }
}
