//! Replay record types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Anything that can be gated by a simulated clock
pub trait Timestamped {
    /// Instant at which the record becomes visible
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Trade direction of a fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Bought, holdings go up and cash goes down
    #[serde(rename = "B")]
    Buy,
    /// Sold, holdings go down and cash goes up
    #[serde(rename = "S")]
    Sell,
}

impl Side {
    /// +1 for buys, -1 for sells
    pub fn sign(self) -> Decimal {
        match self {
            Side::Buy => Decimal::ONE,
            Side::Sell => Decimal::NEGATIVE_ONE,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown side {0:?}, expected B or S")]
pub struct ParseSideError(pub String);

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "B" => Ok(Side::Buy),
            "S" => Ok(Side::Sell),
            other => Err(ParseSideError(other.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("B"),
            Side::Sell => f.write_str("S"),
        }
    }
}

/// An executed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillRecord {
    /// Execution time
    pub timestamp: DateTime<Utc>,
    /// Instrument symbol
    pub symbol: String,
    /// Execution price
    pub price: Decimal,
    /// Unsigned quantity; direction comes from `side`
    pub size: Decimal,
    /// Buy or sell
    pub side: Side,
}

impl FillRecord {
    /// Change in holdings caused by this fill
    pub fn signed_size(&self) -> Decimal {
        self.size * self.side.sign()
    }

    /// Change in cash caused by this fill, `None` if `size * price` overflows
    pub fn cash_delta(&self) -> Option<Decimal> {
        let notional = self.size.checked_mul(self.price)?;
        Some(-(notional * self.side.sign()))
    }
}

impl Timestamped for FillRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// An observed market price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Observation time
    pub timestamp: DateTime<Utc>,
    /// Instrument symbol
    pub symbol: String,
    /// Last price
    pub price: Decimal,
}

impl Timestamped for PriceRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
