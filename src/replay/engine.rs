//! Wires the two loops together around one portfolio

use super::{
    FillLoop, LoopContext, LoopError, LoopExit, LoopOutcome, PriceLoop, RetryPolicy, StopHandle,
};
use crate::clock::{Clock, VirtualClock};
use crate::config::Config;
use crate::feed::{FeedCursor, FillRecord, PriceRecord};
use crate::portfolio::{Portfolio, Valuation};
use crate::telemetry::{self, GaugeMetric};
use serde::Serialize;
use std::io::Write;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

/// Result of a finished replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    /// Portfolio valuation once both loops have stopped
    pub valuation: Valuation,
    pub fills: LoopOutcome,
    pub prices: LoopOutcome,
    /// PNL lines written
    pub reports: u64,
}

/// Runs one replay: fill loop in a background task, price loop in the caller's.
///
/// The stop signal is one-shot, so an engine replays once.
pub struct ReplayEngine {
    clock: Arc<dyn Clock>,
    portfolio: Arc<Portfolio>,
    retry: RetryPolicy,
    poll_interval: Duration,
    stop: StopHandle,
}

impl ReplayEngine {
    pub fn new(clock: Arc<dyn Clock>, retry: RetryPolicy, poll_interval: Duration) -> Self {
        Self {
            clock,
            portfolio: Arc::new(Portfolio::new()),
            retry,
            poll_interval,
            stop: StopHandle::new(),
        }
    }

    /// Engine on a [`VirtualClock`] that starts ticking now
    pub fn from_config(config: &Config) -> Self {
        let clock = VirtualClock::with_epoch(config.clock.epoch, config.clock.acceleration);
        Self::new(
            Arc::new(clock),
            RetryPolicy::from_config(&config.replay),
            config.replay.poll_interval(),
        )
    }

    /// Shared portfolio, readable while the replay runs
    pub fn portfolio(&self) -> Arc<Portfolio> {
        self.portfolio.clone()
    }

    /// Handle that stops both loops, e.g. from a Ctrl-C handler
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    fn context(&self) -> LoopContext {
        LoopContext {
            clock: self.clock.clone(),
            portfolio: self.portfolio.clone(),
            retry: self.retry,
            poll_interval: self.poll_interval,
            stop: self.stop.token(),
        }
    }

    /// Replay both feeds, writing PNL lines to `out`.
    ///
    /// Returns once the price loop ends (exhaustion under the retry policy or
    /// a stop signal). The fill loop is then stopped and joined. A fill loop
    /// that failed or panicked is logged and does not fail the replay.
    pub async fn run<W: Write + Send>(
        &self,
        fills: FeedCursor<FillRecord>,
        prices: FeedCursor<PriceRecord>,
        out: W,
    ) -> Result<ReplaySummary, LoopError> {
        tracing::info!(fills = fills.len(), prices = prices.len(), "start fill update");
        let fill_loop = FillLoop::new(fills, self.context());
        let fills_applied = fill_loop.applied();
        let fill_task = tokio::spawn(fill_loop.run());

        let mut price_loop = PriceLoop::new(prices, self.context(), out);
        let price_result = price_loop.run().await;
        if let Err(e) = &price_result {
            tracing::error!(error = %e, "Price loop failed");
        }

        self.stop.stop();
        let fills = match fill_task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Fill loop failed");
                LoopOutcome {
                    exit: LoopExit::Failed,
                    processed: fills_applied.load(Ordering::Relaxed),
                    retries: 0,
                }
            }
        };
        let prices = price_result?;

        let valuation = self.portfolio.valuation().await;
        telemetry::set_gauge(GaugeMetric::Cash, valuation.cash);
        telemetry::set_gauge(GaugeMetric::MarkToMarket, valuation.mark_to_market);
        telemetry::set_gauge(GaugeMetric::Pnl, valuation.pnl);
        tracing::info!(
            cash = %valuation.cash,
            mark_to_market = %valuation.mark_to_market,
            pnl = %valuation.pnl,
            fills = fills.processed,
            prices = prices.processed,
            reports = price_loop.reports(),
            "Replay finished"
        );

        Ok(ReplaySummary {
            valuation,
            fills,
            prices,
            reports: price_loop.reports(),
        })
    }
}
