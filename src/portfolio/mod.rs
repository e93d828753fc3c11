//! Portfolio module
//!
//! Shared cash, holdings and last-price state for the replay loops. All
//! three live behind one lock so a report never mixes cash from before a
//! fill with holdings from after it.

mod book;
mod report;

pub use report::{PnlReport, Valuation};

use crate::feed::{FillRecord, PriceRecord};
use crate::telemetry::{self, CounterMetric};
use book::Book;
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::Mutex;

/// Portfolio update errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortfolioError {
    /// Holding or cash would overflow; nothing was applied
    #[error("Fill for {symbol} overflows holdings or cash")]
    Overflow { symbol: String },
}

/// Portfolio state shared between the fill and price loops
#[derive(Debug, Default)]
pub struct Portfolio {
    book: Mutex<Book>,
}

impl Portfolio {
    /// Create an empty portfolio with zero cash
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a fill to holdings and cash atomically.
    ///
    /// On error neither holdings nor cash changed.
    pub async fn apply_fill(&self, fill: &FillRecord) -> Result<(), PortfolioError> {
        let mut book = self.book.lock().await;
        book.apply_fill(fill)?;
        tracing::debug!(
            symbol = %fill.symbol,
            side = %fill.side,
            size = %fill.size,
            price = %fill.price,
            holding = ?book.holding(&fill.symbol),
            cash = %book.cash(),
            "Fill applied"
        );
        Ok(())
    }

    /// Record a price update and, if the symbol is held, build its report
    pub async fn apply_price(&self, price: &PriceRecord) -> Option<PnlReport> {
        let mut book = self.book.lock().await;
        book.apply_price(price)
    }

    /// Accumulated signed cash
    pub async fn cash(&self) -> Decimal {
        self.book.lock().await.cash()
    }

    /// Value of all priced holdings. Unpriced or overflowing symbols are
    /// skipped with a warning.
    pub async fn mark_to_market(&self) -> Decimal {
        self.valuation().await.mark_to_market
    }

    /// Cash plus mark-to-market
    pub async fn pnl(&self) -> Decimal {
        self.valuation().await.pnl
    }

    /// Cash, mark-to-market and P&L from one consistent snapshot
    pub async fn valuation(&self) -> Valuation {
        self.book.lock().await.valuation()
    }

    /// Signed holding for `symbol`, `None` if it was never traded
    pub async fn holding(&self, symbol: &str) -> Option<Decimal> {
        self.book.lock().await.holding(symbol)
    }

    /// Most recent price seen for `symbol`
    pub async fn last_price(&self, symbol: &str) -> Option<Decimal> {
        self.book.lock().await.last_price(symbol)
    }
}

fn warn_unpriced(symbols: &[String]) {
    telemetry::increment(CounterMetric::UnpricedHoldings);
    tracing::warn!(
        symbols = ?symbols,
        "Holdings without a usable price, leaving them out of mark-to-market"
    );
}
