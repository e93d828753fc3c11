//! CLI interface for pnl-replay
//!
//! Provides subcommands for:
//! - `replay`: Replay fill and price logs and print PNL lines
//! - `config`: Show the effective configuration

mod replay;

pub use replay::{ReplayArgs, SummaryFormat};

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pnl-replay")]
#[command(about = "Replay fill and price logs against an accelerated clock and report P&L")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay fills and prices, printing a PNL line per price update on a held symbol
    Replay(ReplayArgs),
    /// Show configuration
    Config,
}
