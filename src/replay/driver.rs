//! Clock-gated pulling with exhaustion handling

use super::{LoopContext, LoopExit};
use crate::feed::{FeedCursor, FeedError, Timestamped};
use crate::telemetry::{self, CounterMetric};

/// Pulls records off one feed on behalf of a replay loop.
///
/// Waits for records that are not due yet, applies the retry policy when
/// the feed is empty, and checks the stop signal before every attempt.
pub(super) struct FeedDriver<R> {
    name: &'static str,
    feed: FeedCursor<R>,
    ctx: LoopContext,
    consecutive_exhausted: u32,
    pub(super) retries: u32,
}

impl<R: Timestamped> FeedDriver<R> {
    pub(super) fn new(name: &'static str, feed: FeedCursor<R>, ctx: LoopContext) -> Self {
        Self {
            name,
            feed,
            ctx,
            consecutive_exhausted: 0,
            retries: 0,
        }
    }

    pub(super) fn ctx(&self) -> &LoopContext {
        &self.ctx
    }

    /// Next eligible record, or the reason the loop has to end
    pub(super) async fn next(&mut self) -> Result<R, LoopExit> {
        loop {
            if self.ctx.stop.is_stopped() {
                return Err(LoopExit::Stopped);
            }

            match self.feed.next_eligible(self.ctx.clock.as_ref()) {
                Ok(Some(record)) => {
                    self.consecutive_exhausted = 0;
                    return Ok(record);
                }
                Ok(None) => {
                    if self.ctx.poll_interval.is_zero() {
                        tokio::task::yield_now().await;
                    } else if self.ctx.stop.sleep(self.ctx.poll_interval).await {
                        return Err(LoopExit::Stopped);
                    }
                }
                Err(FeedError::Exhausted) => {
                    self.consecutive_exhausted += 1;
                    let Some(delay) = self.ctx.retry.next_delay(self.consecutive_exhausted) else {
                        tracing::info!(feed = self.name, "No more feed");
                        return Err(LoopExit::Exhausted);
                    };

                    self.retries += 1;
                    telemetry::increment(CounterMetric::FeedRetries);
                    tracing::warn!(
                        feed = self.name,
                        delay_secs = delay.as_secs_f64(),
                        "No feed, sleeping before retry"
                    );
                    if self.ctx.stop.sleep(delay).await {
                        return Err(LoopExit::Stopped);
                    }
                }
            }
        }
    }
}
