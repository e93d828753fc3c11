//! Data loading module
//!
//! Reads pre-sorted fill and price logs, plain or gzip-compressed

mod loader;

pub use loader::{load_fills, load_prices, parse_fill, parse_price, read_records, LoadError};
