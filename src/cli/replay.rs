//! Replay command implementation

use crate::config::{Config, ReplayMode};
use crate::data::{load_fills, load_prices};
use crate::feed::FeedCursor;
use crate::replay::{ReplayEngine, ReplaySummary};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use std::io::BufWriter;
use std::path::PathBuf;

/// How to print the end-of-run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    Table,
    Json,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Fills log (plain or .gz)
    pub fills: PathBuf,

    /// Prices log (plain or .gz)
    pub prices: PathBuf,

    /// Simulated seconds per real second, overrides the config
    #[arg(long)]
    pub acceleration: Option<f64>,

    /// Stop once both feeds are consumed instead of polling forever
    #[arg(long)]
    pub bounded: bool,

    /// Drop records at or after this instant (RFC 3339)
    #[arg(long)]
    pub until: Option<DateTime<Utc>>,

    /// Print a summary after the replay ends
    #[arg(long, value_enum)]
    pub summary: Option<SummaryFormat>,
}

impl ReplayArgs {
    /// Config with command-line overrides applied
    pub fn effective_config(&self, config: &Config) -> anyhow::Result<Config> {
        let mut config = config.clone();
        if let Some(acceleration) = self.acceleration {
            config.clock.acceleration = acceleration;
        }
        if self.bounded {
            config.replay.mode = ReplayMode::Bounded;
        }
        config.validate()?;
        Ok(config)
    }

    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let config = self.effective_config(config)?;

        let fills = load_fills(&self.fills, self.until)?;
        let prices = load_prices(&self.prices, self.until)?;

        tracing::info!(
            acceleration = config.clock.acceleration,
            mode = ?config.replay.mode,
            "Starting replay"
        );
        let engine = ReplayEngine::from_config(&config);

        let stop = engine.stop_handle();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("stopping");
                stop.stop();
            }
        });

        // Report writes block the price task; buffer them, the loop flushes on exit
        let out = BufWriter::new(std::io::stdout());
        let summary = engine
            .run(FeedCursor::new(fills), FeedCursor::new(prices), out)
            .await?;

        if let Some(format) = self.summary {
            print_summary(&summary, format)?;
        }
        Ok(())
    }
}

fn print_summary(summary: &ReplaySummary, format: SummaryFormat) -> anyhow::Result<()> {
    match format {
        SummaryFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        SummaryFormat::Table => {
            let valuation = &summary.valuation;
            println!("Replay summary");
            println!("  Cash:           {:.2}", valuation.cash);
            println!("  Mark-to-market: {:.2}", valuation.mark_to_market);
            println!("  P&L:            {:.2}", valuation.pnl);
            println!(
                "  Fills:          {} ({:?})",
                summary.fills.processed, summary.fills.exit
            );
            println!(
                "  Prices:         {} ({:?})",
                summary.prices.processed, summary.prices.exit
            );
            println!("  PNL lines:      {}", summary.reports);
            if !valuation.unpriced.is_empty() {
                println!("  Unpriced:       {}", valuation.unpriced.join(", "));
            }
        }
    }
    Ok(())
}
