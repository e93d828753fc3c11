//! pnl-replay: accelerated fill/price replay with mark-to-market P&L
//!
//! This library provides the core components for:
//! - A virtual clock that runs simulated time faster than real time
//! - Clock-gated cursors over pre-sorted fill and price records
//! - A shared portfolio of cash, holdings and last prices
//! - Concurrent fill and price loops that print PNL lines
//! - Log loading, configuration and telemetry for the binary

pub mod cli;
pub mod clock;
pub mod config;
pub mod data;
pub mod feed;
pub mod portfolio;
pub mod replay;
pub mod telemetry;
