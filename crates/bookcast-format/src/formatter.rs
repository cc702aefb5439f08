//! Canonical ladder formatting.
//!
//! Grouping buckets prices to a configured multiple, always in the
//! price-favorable-to-maker direction: bids round down, asks round up.
//! Sizes landing in the same bucket are summed. Depth truncation is a plain
//! prefix cut of the already-sorted (and possibly grouped) ladder, so a
//! truncated ladder is always a prefix of the full one.

use crate::error::{FormatError, FormatResult};
use bookcast_core::{PriceLevel, RawBook};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One ladder level with numerics rendered as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedLevel {
    pub price: String,
    pub size: String,
}

/// A formatted ladder pair, ready for payload assembly.
///
/// Carries no slot: the book slot is captured by the caller before
/// formatting and re-attached by the payload builder under its own key, so
/// it can never be confused with the market slot downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedBook {
    pub bids: Vec<FormattedLevel>,
    pub asks: Vec<FormattedLevel>,
}

impl FormattedBook {
    /// SHA-256 hex digest of the ladder content.
    ///
    /// Stable across cycles whose ladders render identically; used by the
    /// change detector to suppress republication of unchanged books.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for level in &self.bids {
            hasher.update(level.price.as_bytes());
            hasher.update(b":");
            hasher.update(level.size.as_bytes());
            hasher.update(b"|");
        }
        hasher.update(b"---");
        for level in &self.asks {
            hasher.update(level.price.as_bytes());
            hasher.update(b":");
            hasher.update(level.size.as_bytes());
            hasher.update(b"|");
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Which way a side's prices move when grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BucketRounding {
    Down,
    Up,
}

/// Format a raw book: group, truncate, render.
///
/// `depth < 0` means unlimited. `grouping` must be positive when set.
pub fn format_book(
    raw: &RawBook,
    grouping: Option<Decimal>,
    depth: i64,
) -> FormatResult<FormattedBook> {
    if let Some(bucket) = grouping {
        if bucket <= Decimal::ZERO {
            return Err(FormatError::InvalidGrouping(bucket));
        }
    }

    let bids = format_side(&raw.bids, grouping, depth, BucketRounding::Down);
    let asks = format_side(&raw.asks, grouping, depth, BucketRounding::Up);

    Ok(FormattedBook { bids, asks })
}

fn format_side(
    levels: &[PriceLevel],
    grouping: Option<Decimal>,
    depth: i64,
    rounding: BucketRounding,
) -> Vec<FormattedLevel> {
    let grouped;
    let levels = match grouping {
        Some(bucket) => {
            grouped = group_levels(levels, bucket, rounding);
            grouped.as_slice()
        }
        None => levels,
    };

    truncate(levels, depth)
        .iter()
        .map(|level| FormattedLevel {
            price: level.price.render(),
            size: level.size.render(),
        })
        .collect()
}

/// Bucket prices to multiples of `bucket`, summing sizes per bucket.
///
/// Input levels are sorted (bids descending, asks ascending), so bucketed
/// prices are monotonic and equal buckets are adjacent; merging the current
/// level into the last output bucket preserves both order and total size.
fn group_levels(levels: &[PriceLevel], bucket: Decimal, rounding: BucketRounding) -> Vec<PriceLevel> {
    let mut out: Vec<PriceLevel> = Vec::with_capacity(levels.len());
    for level in levels {
        let bucketed = match rounding {
            BucketRounding::Down => level.price.bucket_down(bucket),
            BucketRounding::Up => level.price.bucket_up(bucket),
        };
        match out.last_mut() {
            Some(last) if last.price == bucketed => {
                last.size = last.size + level.size;
            }
            _ => out.push(PriceLevel::new(bucketed, level.size)),
        }
    }
    out
}

fn truncate(levels: &[PriceLevel], depth: i64) -> &[PriceLevel] {
    if depth < 0 {
        return levels;
    }
    let take = (depth as usize).min(levels.len());
    &levels[..take]
}
