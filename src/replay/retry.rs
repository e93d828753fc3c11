//! What a loop does when its feed runs dry

use crate::config::{ReplayConfig, ReplayMode};
use std::time::Duration;

/// Exhaustion handling shared by both replay loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Sleep `delay` and poll again. `max_retries: None` retries forever.
    Backoff {
        delay: Duration,
        max_retries: Option<u32>,
    },
    /// End the loop on the first exhaustion
    Terminate,
}

impl RetryPolicy {
    /// Production retries forever with the configured backoff, bounded terminates
    pub fn from_config(config: &ReplayConfig) -> Self {
        match config.mode {
            ReplayMode::Production => RetryPolicy::Backoff {
                delay: config.retry_backoff(),
                max_retries: None,
            },
            ReplayMode::Bounded => RetryPolicy::Terminate,
        }
    }

    /// Delay before retry number `attempt` (1-based), or `None` to give up
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        match *self {
            RetryPolicy::Backoff { delay, max_retries } => match max_retries {
                Some(max) if attempt > max => None,
                _ => Some(delay),
            },
            RetryPolicy::Terminate => None,
        }
    }
}
