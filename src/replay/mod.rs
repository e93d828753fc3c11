//! Replay module
//!
//! Two loops share one [`Portfolio`]: the fill loop runs in a background
//! task and writes holdings and cash, the price loop runs in the caller's
//! task, records prices and prints a PNL line whenever a held symbol
//! reprices. Both are gated by the same simulated clock.

mod driver;
mod engine;
mod fill_loop;
mod price_loop;
mod retry;
mod shutdown;

pub use engine::{ReplayEngine, ReplaySummary};
pub use fill_loop::FillLoop;
pub use price_loop::PriceLoop;
pub use retry::RetryPolicy;
pub use shutdown::{StopHandle, StopToken};

use crate::clock::Clock;
use crate::portfolio::Portfolio;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Everything a loop needs besides its own feed
#[derive(Clone)]
pub struct LoopContext {
    /// Simulated time gate
    pub clock: Arc<dyn Clock>,
    /// Shared state both loops read and write
    pub portfolio: Arc<Portfolio>,
    /// Exhaustion handling
    pub retry: RetryPolicy,
    /// Real wait between checks of a record that is not due yet
    pub poll_interval: Duration,
    /// Checked before every record
    pub stop: StopToken,
}

/// Why a loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopExit {
    /// Feed consumed and the retry policy gave up
    Exhausted,
    /// Stop signal raised
    Stopped,
    /// Loop died on an error or panic
    Failed,
}

/// Final state of one loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoopOutcome {
    pub exit: LoopExit,
    /// Records consumed from the feed
    pub processed: u64,
    /// Backoff sleeps taken on an exhausted feed
    pub retries: u32,
}

/// Replay loop errors
#[derive(Debug, Error)]
pub enum LoopError {
    /// Writing a PNL line failed
    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}
