//! Clock-gated record cursor

use super::Timestamped;
use crate::clock::Clock;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use thiserror::Error;

/// Feed delivery errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FeedError {
    /// No records left to deliver
    #[error("No more feed")]
    Exhausted,
}

/// Pre-sorted records consumed strictly front to back.
///
/// A record is handed out only once the clock has reached its timestamp.
/// Records that are not yet eligible stay at the front; nothing is ever
/// popped and pushed back.
#[derive(Debug, Clone)]
pub struct FeedCursor<R> {
    records: VecDeque<R>,
}

impl<R: Timestamped> FeedCursor<R> {
    /// Wrap records in their input order. The cursor does not re-sort.
    pub fn new(records: impl IntoIterator<Item = R>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// Pop the front record if `clock` has reached its timestamp.
    ///
    /// Returns `Ok(None)` when the front record is still in the future and
    /// `Err(FeedError::Exhausted)` when nothing is left. Never blocks.
    pub fn next_eligible(&mut self, clock: &dyn Clock) -> Result<Option<R>, FeedError> {
        let front = self.records.front().ok_or(FeedError::Exhausted)?;
        if front.timestamp() <= clock.now() {
            Ok(self.records.pop_front())
        } else {
            Ok(None)
        }
    }

    /// Timestamp of the next record to be delivered
    pub fn peek_timestamp(&self) -> Option<DateTime<Utc>> {
        self.records.front().map(Timestamped::timestamp)
    }

    /// Records still waiting to be delivered
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True once every record has been delivered
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: Timestamped> FromIterator<R> for FeedCursor<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter)
    }
}
