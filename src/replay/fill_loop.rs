//! Background fill ingestion

use super::driver::FeedDriver;
use super::{LoopContext, LoopExit, LoopOutcome};
use crate::feed::{FeedCursor, FillRecord};
use crate::telemetry::{self, CounterMetric};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Applies eligible fills to the shared portfolio until stopped or exhausted
pub struct FillLoop {
    driver: FeedDriver<FillRecord>,
    applied: Arc<AtomicU64>,
}

impl FillLoop {
    pub fn new(fills: FeedCursor<FillRecord>, ctx: LoopContext) -> Self {
        Self {
            driver: FeedDriver::new("fills", fills, ctx),
            applied: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Count of fills applied so far, readable after the loop's task is gone
    pub fn applied(&self) -> Arc<AtomicU64> {
        self.applied.clone()
    }

    /// Run until the stop signal, exhaustion under the retry policy, or a fill
    /// the portfolio rejects
    pub async fn run(mut self) -> LoopOutcome {
        let exit = loop {
            let fill = match self.driver.next().await {
                Ok(fill) => fill,
                Err(exit) => break exit,
            };

            if let Err(e) = self.driver.ctx().portfolio.apply_fill(&fill).await {
                tracing::error!(
                    error = %e,
                    timestamp = %fill.timestamp,
                    "Fill rejected, stopping fill update"
                );
                break LoopExit::Failed;
            }
            self.applied.fetch_add(1, Ordering::Relaxed);
            telemetry::increment(CounterMetric::FillsApplied);
        };
        let processed = self.applied.load(Ordering::Relaxed);

        if exit == LoopExit::Stopped {
            tracing::info!("stop fill update");
        }
        tracing::debug!(?exit, processed, "Fill loop finished");

        LoopOutcome {
            exit,
            processed,
            retries: self.driver.retries,
        }
    }
}
