//! End-to-end replay tests

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use pnl_replay::clock::ManualClock;
use pnl_replay::config::{Config, ReplayMode};
use pnl_replay::data::{load_fills, load_prices};
use pnl_replay::feed::{FeedCursor, FillRecord, PriceRecord, Side};
use pnl_replay::portfolio::Portfolio;
use pnl_replay::replay::{LoopExit, ReplayEngine, RetryPolicy};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2014, 1, 1, 0, 0, 0).unwrap()
}

fn fill(minutes: i64, symbol: &str, price: Decimal, size: Decimal, side: Side) -> FillRecord {
    FillRecord {
        timestamp: start() + TimeDelta::minutes(minutes),
        symbol: symbol.to_string(),
        price,
        size,
        side,
    }
}

fn price(minutes: i64, symbol: &str, price: Decimal) -> PriceRecord {
    PriceRecord {
        timestamp: start() + TimeDelta::minutes(minutes),
        symbol: symbol.to_string(),
        price,
    }
}

async fn wait_for_holding(portfolio: &Portfolio, symbol: &str, expected: Decimal) {
    for _ in 0..1000 {
        if portfolio.holding(symbol).await == Some(expected) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("{symbol} never reached holding {expected}");
}

async fn wait_for_price(portfolio: &Portfolio, symbol: &str, expected: Decimal) {
    for _ in 0..1000 {
        if portfolio.last_price(symbol).await == Some(expected) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("{symbol} never reached price {expected}");
}

fn bounded_config(acceleration: f64) -> Config {
    let mut config = Config::default();
    config.clock.acceleration = acceleration;
    config.replay.mode = ReplayMode::Bounded;
    config
}

#[tokio::test]
async fn test_reports_follow_the_clock() {
    let clock = Arc::new(ManualClock::new(start()));
    let engine = Arc::new(ReplayEngine::new(
        clock.clone(),
        RetryPolicy::Terminate,
        Duration::from_millis(1),
    ));
    let portfolio = engine.portfolio();

    let fills = FeedCursor::new(vec![
        fill(1, "AAPL", dec!(100), dec!(10), Side::Buy),
        fill(3, "AAPL", dec!(102), dec!(10), Side::Buy),
    ]);
    let prices = FeedCursor::new(vec![
        price(2, "AAPL", dec!(101)),
        price(4, "AAPL", dec!(103)),
    ]);

    let runner = engine.clone();
    let task = tokio::spawn(async move {
        let mut out = Vec::new();
        let summary = runner.run(fills, prices, &mut out).await;
        (summary, out)
    });

    clock.set(start() + TimeDelta::minutes(1));
    wait_for_holding(&portfolio, "AAPL", dec!(10)).await;

    clock.set(start() + TimeDelta::minutes(2));
    wait_for_price(&portfolio, "AAPL", dec!(101)).await;

    clock.set(start() + TimeDelta::minutes(3));
    wait_for_holding(&portfolio, "AAPL", dec!(20)).await;

    clock.set(start() + TimeDelta::minutes(4));
    let (summary, out) = task.await.unwrap();
    let summary = summary.unwrap();

    let output = String::from_utf8(out).unwrap();
    assert_eq!(
        output.lines().collect::<Vec<_>>(),
        vec!["PNL 1388534520000 AAPL 10 10.00", "PNL 1388534640000 AAPL 20 40.00"]
    );
    assert_eq!(summary.valuation.cash, dec!(-2020));
    assert_eq!(summary.valuation.mark_to_market, dec!(2060));
    assert_eq!(summary.valuation.pnl, dec!(40));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_virtual_clock_replay_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let fills_path = dir.path().join("fills");
    let prices_path = dir.path().join("prices");

    // Fills in the first simulated minutes, prices half an hour later
    std::fs::write(
        &fills_path,
        "\
F 1388534400000 AAPL 100.00 10 B
F 1388534405000 MSFT 40.00 30 B
F 1388534410000 AAPL 105.00 4 S
F 1388534415000 GOOG 1100.00 1 S
",
    )
    .unwrap();
    std::fs::write(
        &prices_path,
        "\
P 1388536200000 AAPL 104.00
P 1388536260000 IBM 180.00
P 1388536320000 MSFT 41.00
P 1388539800000 AAPL 999.00
",
    )
    .unwrap();

    let until = Utc.with_ymd_and_hms(2014, 1, 1, 1, 0, 0).unwrap();
    let fills = load_fills(&fills_path, None).unwrap();
    let prices = load_prices(&prices_path, Some(until)).unwrap();
    assert_eq!(prices.len(), 3);

    let engine = ReplayEngine::from_config(&bounded_config(18000.0));
    let mut out = Vec::new();
    let summary = tokio::time::timeout(
        Duration::from_secs(10),
        engine.run(FeedCursor::new(fills), FeedCursor::new(prices), &mut out),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(summary.fills.processed, 4);
    assert_eq!(summary.prices.exit, LoopExit::Exhausted);
    assert_eq!(summary.prices.processed, 3);
    assert_eq!(summary.reports, 2);

    // cash: -1000 - 1200 + 420 + 1100
    assert_eq!(summary.valuation.cash, dec!(-680));
    // GOOG never priced, left out of mark-to-market
    assert_eq!(summary.valuation.mark_to_market, dec!(1854));
    assert_eq!(summary.valuation.pnl, dec!(1174));
    assert_eq!(summary.valuation.unpriced, vec!["GOOG".to_string()]);

    let output = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("PNL 1388536200000 AAPL 6 "));
    assert!(lines[1].starts_with("PNL 1388536320000 MSFT 30 "));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_empty_fills_bounded_replay_runs_prices_to_completion() {
    let engine = ReplayEngine::from_config(&bounded_config(1_000_000.0));
    let prices = FeedCursor::new(vec![price(1, "AAPL", dec!(10)), price(2, "AAPL", dec!(11))]);

    let mut out = Vec::new();
    let summary = engine
        .run(FeedCursor::new(vec![]), prices, &mut out)
        .await
        .unwrap();

    assert_eq!(summary.fills.exit, LoopExit::Exhausted);
    assert_eq!(summary.fills.processed, 0);
    assert_eq!(summary.prices.processed, 2);
    assert!(out.is_empty());
    assert_eq!(engine.portfolio().last_price("AAPL").await, Some(dec!(11)));
}

/// Replays the one-day reference logs.
///
/// Run with `PNL_REPLAY_FILLS=fills.gz PNL_REPLAY_PRICES=prices.gz cargo test -- --ignored`.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore = "needs the reference fills.gz and prices.gz"]
async fn test_reference_day_scenario() {
    let fills_path = std::env::var("PNL_REPLAY_FILLS").unwrap();
    let prices_path = std::env::var("PNL_REPLAY_PRICES").unwrap();

    let fills = load_fills(
        fills_path,
        Some(Utc.with_ymd_and_hms(2014, 1, 2, 0, 0, 0).unwrap()),
    )
    .unwrap();
    let prices = load_prices(
        prices_path,
        Some(Utc.with_ymd_and_hms(2014, 1, 2, 1, 0, 0).unwrap()),
    )
    .unwrap();

    let engine = ReplayEngine::from_config(&bounded_config(18000.0));
    let summary = engine
        .run(FeedCursor::new(fills), FeedCursor::new(prices), std::io::sink())
        .await
        .unwrap();

    let tolerance = dec!(0.01);
    assert!((summary.valuation.cash - dec!(-676493.00)).abs() <= tolerance);
    assert!((summary.valuation.mark_to_market - dec!(666720.00)).abs() <= tolerance);
    assert!((summary.valuation.pnl - dec!(-9773.00)).abs() <= tolerance);
}
