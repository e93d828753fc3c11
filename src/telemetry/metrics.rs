//! Prometheus metrics

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::net::SocketAddr;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Fills applied to the portfolio
    FillsApplied,
    /// Price updates consumed
    PricesSeen,
    /// PNL lines written
    Reports,
    /// Valuations that left out at least one unpriced holding
    UnpricedHoldings,
    /// Sleeps taken because a feed ran dry
    FeedRetries,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Accumulated cash
    Cash,
    /// Mark-to-market value of holdings
    MarkToMarket,
    /// Cash + mark-to-market
    Pnl,
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::FillsApplied => "pnl_replay_fills_applied_total",
            CounterMetric::PricesSeen => "pnl_replay_prices_seen_total",
            CounterMetric::Reports => "pnl_replay_reports_total",
            CounterMetric::UnpricedHoldings => "pnl_replay_unpriced_holdings_total",
            CounterMetric::FeedRetries => "pnl_replay_feed_retries_total",
        }
    }
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::Cash => "pnl_replay_cash",
            GaugeMetric::MarkToMarket => "pnl_replay_mark_to_market",
            GaugeMetric::Pnl => "pnl_replay_pnl",
        }
    }
}

/// Bump a counter by one
pub fn increment(metric: CounterMetric) {
    ::metrics::counter!(metric.name()).increment(1);
}

/// Set a gauge from a decimal value
pub fn set_gauge(metric: GaugeMetric, value: Decimal) {
    let value = value.to_f64().unwrap_or_default();
    ::metrics::gauge!(metric.name()).set(value);
    tracing::trace!(metric = metric.name(), value, "Setting gauge");
}

/// Install the Prometheus exporter on `0.0.0.0:port`.
///
/// Must be called from inside a tokio runtime.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus metrics exporter listening");
    Ok(())
}
