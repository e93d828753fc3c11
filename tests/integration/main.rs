//! Integration tests for pnl-replay

mod config_test;
mod loader_test;
mod replay_test;
