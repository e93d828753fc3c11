//! Foreground price ingestion and P&L reporting

use super::driver::FeedDriver;
use super::{LoopContext, LoopError, LoopOutcome};
use crate::feed::{FeedCursor, PriceRecord};
use crate::telemetry::{self, CounterMetric, GaugeMetric};
use std::io::Write;

/// Records prices and writes a PNL line for every update on a held symbol
pub struct PriceLoop<W> {
    driver: FeedDriver<PriceRecord>,
    out: W,
    reports: u64,
}

impl<W: Write> PriceLoop<W> {
    pub fn new(prices: FeedCursor<PriceRecord>, ctx: LoopContext, out: W) -> Self {
        Self {
            driver: FeedDriver::new("prices", prices, ctx),
            out,
            reports: 0,
        }
    }

    /// Run until exhaustion or stop. Fails only if the output cannot be written.
    pub async fn run(&mut self) -> Result<LoopOutcome, LoopError> {
        let mut processed = 0;

        let exit = loop {
            let price = match self.driver.next().await {
                Ok(price) => price,
                Err(exit) => break exit,
            };
            processed += 1;
            telemetry::increment(CounterMetric::PricesSeen);

            let Some(report) = self.driver.ctx().portfolio.apply_price(&price).await else {
                continue;
            };

            writeln!(self.out, "{report}")?;
            self.reports += 1;
            telemetry::increment(CounterMetric::Reports);
            telemetry::set_gauge(GaugeMetric::Pnl, report.pnl);
        };

        self.out.flush()?;
        tracing::debug!(?exit, processed, reports = self.reports, "Price loop finished");

        Ok(LoopOutcome {
            exit,
            processed,
            retries: self.driver.retries,
        })
    }

    /// PNL lines written so far
    pub fn reports(&self) -> u64 {
        self.reports
    }

    /// Give back the output writer
    pub fn into_inner(self) -> W {
        self.out
    }
}
