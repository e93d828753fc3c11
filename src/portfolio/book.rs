//! Unguarded portfolio state
//!
//! Everything here runs while the caller holds the portfolio lock.

use super::{PnlReport, PortfolioError, Valuation};
use crate::feed::{FillRecord, PriceRecord};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Cash, holdings and last prices. Only reachable through [`super::Portfolio`].
#[derive(Debug, Default)]
pub(super) struct Book {
    cash: Decimal,
    holdings: HashMap<String, Decimal>,
    last_prices: HashMap<String, Decimal>,
}

impl Book {
    /// Apply both sides of a fill or neither
    pub(super) fn apply_fill(&mut self, fill: &FillRecord) -> Result<(), PortfolioError> {
        let overflow = || PortfolioError::Overflow {
            symbol: fill.symbol.clone(),
        };

        let held = self.holding(&fill.symbol).unwrap_or_default();
        let holding = held.checked_add(fill.signed_size()).ok_or_else(overflow)?;
        let cash = fill
            .cash_delta()
            .and_then(|delta| self.cash.checked_add(delta))
            .ok_or_else(overflow)?;

        self.holdings.insert(fill.symbol.clone(), holding);
        self.cash = cash;
        Ok(())
    }

    /// Record the price, then build a report if the symbol has ever been held
    pub(super) fn apply_price(&mut self, price: &PriceRecord) -> Option<PnlReport> {
        self.last_prices.insert(price.symbol.clone(), price.price);

        let quantity = *self.holdings.get(&price.symbol)?;
        let valuation = self.valuation();
        Some(PnlReport {
            timestamp_millis: price.timestamp.timestamp_millis(),
            symbol: price.symbol.clone(),
            quantity,
            pnl: valuation.pnl,
        })
    }

    pub(super) fn cash(&self) -> Decimal {
        self.cash
    }

    pub(super) fn holding(&self, symbol: &str) -> Option<Decimal> {
        self.holdings.get(symbol).copied()
    }

    pub(super) fn last_price(&self, symbol: &str) -> Option<Decimal> {
        self.last_prices.get(symbol).copied()
    }

    /// Sum of `quantity * price` over priced holdings, plus the held symbols
    /// that were left out: no price yet, or a value that overflows.
    pub(super) fn mark_to_market(&self) -> (Decimal, Vec<String>) {
        let mut total = Decimal::ZERO;
        let mut unpriced = Vec::new();

        for (symbol, quantity) in &self.holdings {
            let sum = self
                .last_prices
                .get(symbol)
                .and_then(|price| quantity.checked_mul(*price))
                .and_then(|value| total.checked_add(value));
            match sum {
                Some(sum) => total = sum,
                None => unpriced.push(symbol.clone()),
            }
        }

        unpriced.sort();
        (total, unpriced)
    }

    pub(super) fn valuation(&self) -> Valuation {
        let (mark_to_market, unpriced) = self.mark_to_market();
        if !unpriced.is_empty() {
            super::warn_unpriced(&unpriced);
        }
        Valuation {
            cash: self.cash,
            mark_to_market,
            pnl: self.cash.saturating_add(mark_to_market),
            unpriced,
        }
    }
}
