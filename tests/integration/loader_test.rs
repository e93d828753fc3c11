//! Log loading integration tests

use chrono::{TimeZone, Utc};
use pnl_replay::data::{load_fills, load_prices, LoadError};
use pnl_replay::feed::Side;
use rust_decimal_macros::dec;

#[test]
fn test_load_fills_and_prices_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let fills_path = dir.path().join("fills");
    let prices_path = dir.path().join("prices");
    std::fs::write(
        &fills_path,
        "F 1388534400000 AAPL 550.50 100 B\nF 1388534401000 AAPL 551.00 40 S\n",
    )
    .unwrap();
    std::fs::write(
        &prices_path,
        "P 1388534400500 AAPL 550.75\nP 1388538000000 AAPL 552.00\n",
    )
    .unwrap();

    let fills = load_fills(&fills_path, None).unwrap();
    assert_eq!(fills.len(), 2);
    assert_eq!(fills[0].side, Side::Buy);
    assert_eq!(fills[1].size, dec!(40));

    let cutoff = Utc.with_ymd_and_hms(2014, 1, 1, 1, 0, 0).unwrap();
    let prices = load_prices(&prices_path, Some(cutoff)).unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0].price, dec!(550.75));
}

#[test]
fn test_malformed_line_names_file_and_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fills");
    std::fs::write(
        &path,
        "F 1388534400000 AAPL 550.50 100 B\nF 1388534401000 AAPL abc 40 S\n",
    )
    .unwrap();

    let err = load_fills(&path, None).unwrap_err();
    assert!(matches!(err, LoadError::Malformed { line: 2, .. }));
    assert!(err.to_string().contains("invalid price"));
}
