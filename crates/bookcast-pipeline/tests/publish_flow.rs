//! End-to-end pipeline tests against the in-memory sink.

use bookcast_core::{
    BookUpdate, MarketKey, MarketType, OracleInfo, Price, PriceLevel, PublishMode, RawBook, Size,
};
use bookcast_monitor::FatalCondition;
use bookcast_pipeline::{AppConfig, MarketEntry, Orchestrator, StaticBookSource};
use bookcast_publish::MemorySink;
use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use std::sync::Arc;

fn perp_market(index: u32, name: &str, mode: PublishMode) -> MarketEntry {
    MarketEntry {
        market_index: index,
        market_type: MarketType::Perp,
        name: name.to_string(),
        depth: -1,
        grouping: None,
        include_secondary_liquidity: false,
        secondary_order_cap: None,
        fallback_liquidity_sources: Vec::new(),
        publish_mode: mode,
    }
}

fn app_config(markets: Vec<MarketEntry>) -> AppConfig {
    AppConfig {
        markets,
        ..AppConfig::default()
    }
}

fn sol_update(book_slot: u64, oracle_slot: u64, market_slot: u64) -> BookUpdate {
    BookUpdate::new(
        RawBook::new(
            vec![
                PriceLevel::new(Price::new(dec!(100)), Size::new(dec!(5))),
                PriceLevel::new(Price::new(dec!(99)), Size::new(dec!(3))),
            ],
            vec![PriceLevel::new(Price::new(dec!(101)), Size::new(dec!(4)))],
            book_slot,
        ),
        OracleInfo::new(Price::new(dec!(100.25)), oracle_slot, Size::new(dec!(0.05))),
        market_slot,
    )
}

#[tokio::test]
async fn test_first_snapshot_publishes_everywhere() {
    let sink = Arc::new(MemorySink::new());
    let config = app_config(vec![perp_market(3, "SOL-PERP", PublishMode::OnChange)]);
    let orchestrator = Orchestrator::new(&config, sink.clone()).unwrap();

    let source = StaticBookSource::new();
    source.insert(MarketKey::perp(3), sol_update(500, 520, 7));

    let report = orchestrator.run_cycle(&source).await.unwrap();
    assert_eq!(report.published, 1);
    assert_eq!(report.failed, 0);

    // One message on the market's channel, ladder rendered as strings
    let messages = sink.messages("orderbook_perp_3");
    assert_eq!(messages.len(), 1);
    let payload: serde_json::Value = serde_json::from_str(&messages[0]).unwrap();
    assert_eq!(payload["marketIndex"], 3);
    assert_eq!(payload["marketType"], "perp");
    assert_eq!(payload["marketName"], "SOL-PERP");
    assert_eq!(payload["slot"], 500);
    assert_eq!(payload["marketSlot"], 7);
    assert_eq!(payload["bids"][0]["price"], "100");
    assert_eq!(payload["bids"][0]["size"], "5");
    assert_eq!(payload["bids"][1]["price"], "99");
    assert_eq!(payload["asks"][0]["price"], "101");
    assert_eq!(payload["oracleData"]["slot"], 520);
    assert_eq!(payload["oracleData"]["price"], "100.25");

    // Full snapshot plus the three depth cuts
    assert_eq!(
        sink.stored_keys(),
        vec![
            "last_update_orderbook_perp_3",
            "last_update_orderbook_perp_3_depth_100",
            "last_update_orderbook_perp_3_depth_20",
            "last_update_orderbook_perp_3_depth_5",
        ]
    );

    // Slot state seeded on first observation
    let state = orchestrator
        .pipeline()
        .monitor()
        .state(&MarketKey::perp(3))
        .unwrap();
    assert_eq!(state.last_market_slot, 7);
}

#[tokio::test]
async fn test_identical_book_publishes_once_in_on_change_mode() {
    let sink = Arc::new(MemorySink::new());
    let config = app_config(vec![perp_market(3, "SOL-PERP", PublishMode::OnChange)]);
    let orchestrator = Orchestrator::new(&config, sink.clone()).unwrap();

    let source = StaticBookSource::new();
    source.insert(MarketKey::perp(3), sol_update(500, 520, 7));
    orchestrator.run_cycle(&source).await.unwrap();

    // Fresh slots, identical ladder
    source.insert(MarketKey::perp(3), sol_update(510, 530, 8));
    let report = orchestrator.run_cycle(&source).await.unwrap();
    assert_eq!(report.published, 0);
    assert_eq!(report.suppressed, 1);

    assert_eq!(sink.messages("orderbook_perp_3").len(), 1);
}

#[tokio::test]
async fn test_identical_book_republishes_in_always_mode() {
    let sink = Arc::new(MemorySink::new());
    let config = app_config(vec![perp_market(3, "SOL-PERP", PublishMode::Always)]);
    let orchestrator = Orchestrator::new(&config, sink.clone()).unwrap();

    let source = StaticBookSource::new();
    source.insert(MarketKey::perp(3), sol_update(500, 520, 7));
    orchestrator.run_cycle(&source).await.unwrap();
    orchestrator.run_cycle(&source).await.unwrap();

    assert_eq!(sink.messages("orderbook_perp_3").len(), 2);
}

#[tokio::test]
async fn test_market_without_update_does_not_stop_the_others() {
    let sink = Arc::new(MemorySink::new());
    let config = app_config(vec![
        perp_market(0, "BTC-PERP", PublishMode::OnChange),
        perp_market(1, "ETH-PERP", PublishMode::OnChange),
    ]);
    let orchestrator = Orchestrator::new(&config, sink.clone()).unwrap();

    // Only market 1 has an update this cycle
    let source = StaticBookSource::new();
    source.insert(MarketKey::perp(1), sol_update(500, 520, 7));

    let report = orchestrator.run_cycle(&source).await.unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.published, 1);
    assert_eq!(sink.messages("orderbook_perp_1").len(), 1);
    assert!(sink.messages("orderbook_perp_0").is_empty());
}

#[tokio::test]
async fn test_slot_divergence_ends_the_run() {
    let sink = Arc::new(MemorySink::new());
    let config = app_config(vec![perp_market(3, "SOL-PERP", PublishMode::OnChange)]);
    let orchestrator = Orchestrator::new(&config, sink.clone()).unwrap();

    let source = StaticBookSource::new();
    source.insert(MarketKey::perp(3), sol_update(1000, 1250, 7));

    let fatal = orchestrator.run_cycle(&source).await.unwrap_err();
    assert_eq!(
        fatal,
        FatalCondition::SlotDivergence {
            market: MarketKey::perp(3),
            book_slot: 1000,
            oracle_slot: 1250,
            threshold: 200,
        }
    );
    assert!(sink.messages("orderbook_perp_3").is_empty());
}

#[tokio::test]
async fn test_divergence_within_threshold_keeps_running() {
    let sink = Arc::new(MemorySink::new());
    let config = app_config(vec![perp_market(3, "SOL-PERP", PublishMode::OnChange)]);
    let orchestrator = Orchestrator::new(&config, sink.clone()).unwrap();

    let source = StaticBookSource::new();
    source.insert(MarketKey::perp(3), sol_update(1000, 1150, 7));

    let report = orchestrator.run_cycle(&source).await.unwrap();
    assert_eq!(report.published, 1);
}

#[tokio::test]
async fn test_frozen_market_slot_ends_the_run() {
    let sink = Arc::new(MemorySink::new());
    let config = app_config(vec![perp_market(3, "SOL-PERP", PublishMode::Always)]);
    let orchestrator = Orchestrator::new(&config, sink.clone()).unwrap();

    // Seed the slot state as if slot 7 was first seen eleven minutes ago,
    // past the perp window
    let market = MarketKey::perp(3);
    orchestrator
        .pipeline()
        .monitor()
        .observe_market_slot_at(market, 7, Utc::now() - Duration::minutes(11))
        .unwrap();

    let source = StaticBookSource::new();
    source.insert(market, sol_update(500, 520, 7));

    let fatal = orchestrator.run_cycle(&source).await.unwrap_err();
    assert!(matches!(
        fatal,
        FatalCondition::FrozenMarketSlot {
            market_slot: 7,
            window_ms: 600_000,
            ..
        }
    ));
}

#[tokio::test]
async fn test_advancing_market_slot_never_trips_staleness() {
    let sink = Arc::new(MemorySink::new());
    let config = app_config(vec![perp_market(3, "SOL-PERP", PublishMode::Always)]);
    let orchestrator = Orchestrator::new(&config, sink.clone()).unwrap();

    let market = MarketKey::perp(3);
    orchestrator
        .pipeline()
        .monitor()
        .observe_market_slot_at(market, 7, Utc::now() - Duration::minutes(11))
        .unwrap();

    // The slot moved, so the old observation time no longer matters
    let source = StaticBookSource::new();
    source.insert(market, sol_update(500, 520, 8));

    let report = orchestrator.run_cycle(&source).await.unwrap();
    assert_eq!(report.published, 1);
    assert_eq!(
        orchestrator
            .pipeline()
            .monitor()
            .state(&market)
            .unwrap()
            .last_market_slot,
        8
    );
}
