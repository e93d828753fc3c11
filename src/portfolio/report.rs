//! P&L output records

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One `PNL` line, emitted for a price update on a held symbol.
///
/// Renders as `PNL <timestampMillis> <symbol> <signedQuantity> <pnl>` with
/// the P&L fixed at two decimals. Exact halves round to even (`0.125` prints
/// `0.12`, `0.375` prints `0.38`), the same result C-style `%.2f` gives for
/// halves a binary float holds exactly. Other halves such as `1.015` round to
/// even on the decimal value (`1.02`), where a float formatter prints from
/// the nearest binary value instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlReport {
    /// Price update time, milliseconds since the unix epoch
    pub timestamp_millis: i64,
    /// Symbol whose price changed
    pub symbol: String,
    /// Signed holding in that symbol
    pub quantity: Decimal,
    /// Portfolio-wide cash + mark-to-market
    pub pnl: Decimal,
}

impl fmt::Display for PnlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PNL {} {} {} {:.2}",
            self.timestamp_millis,
            self.symbol,
            self.quantity.normalize(),
            self.pnl.round_dp(2)
        )
    }
}

/// Point-in-time portfolio valuation taken under a single lock acquisition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    /// Accumulated signed cash
    pub cash: Decimal,
    /// Value of priced holdings at their last price
    pub mark_to_market: Decimal,
    /// `cash + mark_to_market`
    pub pnl: Decimal,
    /// Held symbols with no price yet or an overflowing value, left out of
    /// `mark_to_market`
    pub unpriced: Vec<String>,
}
