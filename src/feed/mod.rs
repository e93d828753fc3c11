//! Replay feed module
//!
//! Fill and price records plus the clock-gated cursor that hands them out

mod cursor;
mod types;

pub use cursor::{FeedCursor, FeedError};
pub use types::{FillRecord, ParseSideError, PriceRecord, Side, Timestamped};
