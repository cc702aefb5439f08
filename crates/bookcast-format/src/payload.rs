//! Enriched snapshot payload.
//!
//! `PayloadBuilder` stages metadata, oracle data, and slot data onto a
//! formatted ladder, each stage consuming the builder and returning a new
//! value, so a partially-enriched payload is never observable.

use crate::formatter::{FormattedBook, FormattedLevel};
use bookcast_core::{MarketDescriptor, MarketType, OracleInfo};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Oracle fields as they appear on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OraclePayload {
    pub price: String,
    pub slot: u64,
    pub confidence: String,
}

impl From<&OracleInfo> for OraclePayload {
    fn from(info: &OracleInfo) -> Self {
        Self {
            price: info.price.render(),
            slot: info.slot,
            confidence: info.confidence.render(),
        }
    }
}

/// The complete published snapshot.
///
/// Ladder and oracle numerics are strings; identifiers, slots, and the
/// millisecond timestamp are plain integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub market_name: String,
    pub market_type: MarketType,
    pub market_index: u32,
    pub bids: Vec<FormattedLevel>,
    pub asks: Vec<FormattedLevel>,
    /// Wall-clock publication time, Unix milliseconds.
    pub ts: i64,
    /// Book slot, captured from the raw snapshot.
    pub slot: u64,
    pub oracle_data: OraclePayload,
    /// Metadata-derived market logical clock.
    pub market_slot: u64,
}

impl BookPayload {
    pub fn builder(descriptor: &MarketDescriptor, book: FormattedBook) -> PayloadBuilder {
        PayloadBuilder::new(descriptor, book)
    }

    /// A copy truncated to `depth` levels per side.
    ///
    /// Pure prefix cut of the already-formatted ladders; never re-sorts or
    /// re-groups.
    pub fn truncated(&self, depth: usize) -> Self {
        let mut copy = self.clone();
        copy.bids.truncate(depth);
        copy.asks.truncate(depth);
        copy
    }
}

/// Staged construction of a [`BookPayload`].
#[derive(Debug)]
pub struct PayloadBuilder {
    market_name: String,
    market_type: MarketType,
    market_index: u32,
    bids: Vec<FormattedLevel>,
    asks: Vec<FormattedLevel>,
    ts: Option<i64>,
    slot: u64,
    oracle_data: OraclePayload,
    market_slot: u64,
}

impl PayloadBuilder {
    pub fn new(descriptor: &MarketDescriptor, book: FormattedBook) -> Self {
        Self {
            market_name: descriptor.name.clone(),
            market_type: descriptor.key.market_type,
            market_index: descriptor.key.index,
            bids: book.bids,
            asks: book.asks,
            ts: None,
            slot: 0,
            oracle_data: OraclePayload::default(),
            market_slot: 0,
        }
    }

    /// Attach the book slot captured from the raw snapshot.
    pub fn book_slot(mut self, slot: u64) -> Self {
        self.slot = slot;
        self
    }

    pub fn oracle(mut self, info: &OracleInfo) -> Self {
        self.oracle_data = OraclePayload::from(info);
        self
    }

    pub fn market_slot(mut self, slot: u64) -> Self {
        self.market_slot = slot;
        self
    }

    /// Pin the publication timestamp. Defaults to now at build time.
    pub fn ts_ms(mut self, ts: i64) -> Self {
        self.ts = Some(ts);
        self
    }

    pub fn build(self) -> BookPayload {
        BookPayload {
            market_name: self.market_name,
            market_type: self.market_type,
            market_index: self.market_index,
            bids: self.bids,
            asks: self.asks,
            ts: self.ts.unwrap_or_else(|| Utc::now().timestamp_millis()),
            slot: self.slot,
            oracle_data: self.oracle_data,
            market_slot: self.market_slot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookcast_core::{MarketKey, Price, Size};
    use rust_decimal_macros::dec;

    fn formatted() -> FormattedBook {
        FormattedBook {
            bids: vec![
                FormattedLevel {
                    price: "100".into(),
                    size: "5".into(),
                },
                FormattedLevel {
                    price: "99".into(),
                    size: "3".into(),
                },
            ],
            asks: vec![FormattedLevel {
                price: "101".into(),
                size: "4".into(),
            }],
        }
    }

    fn descriptor() -> MarketDescriptor {
        MarketDescriptor::new(MarketKey::perp(3), "SOL-PERP")
    }

    fn oracle() -> OracleInfo {
        OracleInfo::new(Price::new(dec!(100.5)), 520, Size::new(dec!(0.05)))
    }

    #[test]
    fn test_builder_assembles_all_fields() {
        let payload = BookPayload::builder(&descriptor(), formatted())
            .book_slot(500)
            .oracle(&oracle())
            .market_slot(7)
            .ts_ms(1_700_000_000_000)
            .build();

        assert_eq!(payload.market_name, "SOL-PERP");
        assert_eq!(payload.market_type, MarketType::Perp);
        assert_eq!(payload.market_index, 3);
        assert_eq!(payload.slot, 500);
        assert_eq!(payload.market_slot, 7);
        assert_eq!(payload.ts, 1_700_000_000_000);
        assert_eq!(payload.oracle_data.price, "100.5");
        assert_eq!(payload.oracle_data.slot, 520);
        assert_eq!(payload.oracle_data.confidence, "0.05");
    }

    #[test]
    fn test_wire_field_names() {
        let payload = BookPayload::builder(&descriptor(), formatted())
            .book_slot(500)
            .oracle(&oracle())
            .market_slot(7)
            .ts_ms(1)
            .build();

        let json: serde_json::Value = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["marketIndex"], 3);
        assert_eq!(json["marketType"], "perp");
        assert_eq!(json["marketName"], "SOL-PERP");
        assert_eq!(json["slot"], 500);
        assert_eq!(json["marketSlot"], 7);
        assert_eq!(json["bids"][0]["price"], "100");
        assert_eq!(json["bids"][0]["size"], "5");
        assert_eq!(json["oracleData"]["price"], "100.5");
    }

    #[test]
    fn test_truncated_is_prefix() {
        let payload = BookPayload::builder(&descriptor(), formatted())
            .book_slot(500)
            .oracle(&oracle())
            .market_slot(7)
            .build();

        let cut = payload.truncated(1);
        assert_eq!(cut.bids.len(), 1);
        assert_eq!(cut.asks.len(), 1);
        assert_eq!(cut.bids[0], payload.bids[0]);
        // Everything else rides along unchanged
        assert_eq!(cut.slot, payload.slot);
        assert_eq!(cut.ts, payload.ts);
        assert_eq!(cut.oracle_data, payload.oracle_data);
    }

    #[test]
    fn test_truncated_beyond_length() {
        let payload = BookPayload::builder(&descriptor(), formatted())
            .book_slot(500)
            .oracle(&oracle())
            .market_slot(7)
            .build();

        let cut = payload.truncated(100);
        assert_eq!(cut.bids.len(), 2);
        assert_eq!(cut.asks.len(), 1);
    }
}
