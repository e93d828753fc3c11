//! Simulated time sources
//!
//! The replay loops never look at the wall clock directly. They ask a
//! [`Clock`] for the current simulated instant and compare it against record
//! timestamps.

mod manual;
mod virtual_clock;

pub use manual::ManualClock;
pub use virtual_clock::{VirtualClock, DEFAULT_EPOCH};

use chrono::{DateTime, Utc};

/// A source of simulated time shared by the replay loops
pub trait Clock: Send + Sync {
    /// Current simulated timestamp
    fn now(&self) -> DateTime<Utc>;
}
