//! Prometheus metrics for the cycle loop

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::path::Path;

pub struct Metrics {
    registry: Registry,
    pub cycles_total: IntCounter,
    pub cycle_failures_total: IntCounter,
    pub tickers_processed_total: IntCounter,
    pub tickers_skipped_total: IntCounter,
    pub signals_total: IntCounterVec,
    pub trades_opened_total: IntCounter,
    pub quote_failures_total: IntCounter,
    pub persistence_failures_total: IntCounter,
    pub notification_failures_total: IntCounter,
    pub cycle_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("trendwatch".to_string()), None)?;

        let cycles_total = IntCounter::new("cycles_total", "Cycles run")?;
        let cycle_failures_total = IntCounter::new(
            "cycle_failures_total",
            "Cycles whose state could not be loaded or saved",
        )?;
        let tickers_processed_total =
            IntCounter::new("tickers_processed_total", "Tickers with refreshed trends")?;
        let tickers_skipped_total = IntCounter::new(
            "tickers_skipped_total",
            "Tickers skipped because data was unavailable",
        )?;
        let signals_total = IntCounterVec::new(
            Opts::new("signals_total", "Crossover signals detected"),
            &["kind"],
        )?;
        let trades_opened_total =
            IntCounter::new("trades_opened_total", "Simulated positions opened")?;
        let quote_failures_total = IntCounter::new(
            "quote_failures_total",
            "Signals dropped because no live quote was available",
        )?;
        let persistence_failures_total =
            IntCounter::new("persistence_failures_total", "Failed state commits")?;
        let notification_failures_total =
            IntCounter::new("notification_failures_total", "Failed report deliveries")?;
        let cycle_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("cycle_duration_seconds", "Wall time of one cycle").buckets(
                vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0],
            ),
        )?;

        registry.register(Box::new(cycles_total.clone()))?;
        registry.register(Box::new(cycle_failures_total.clone()))?;
        registry.register(Box::new(tickers_processed_total.clone()))?;
        registry.register(Box::new(tickers_skipped_total.clone()))?;
        registry.register(Box::new(signals_total.clone()))?;
        registry.register(Box::new(trades_opened_total.clone()))?;
        registry.register(Box::new(quote_failures_total.clone()))?;
        registry.register(Box::new(persistence_failures_total.clone()))?;
        registry.register(Box::new(notification_failures_total.clone()))?;
        registry.register(Box::new(cycle_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            cycles_total,
            cycle_failures_total,
            tickers_processed_total,
            tickers_skipped_total,
            signals_total,
            trades_opened_total,
            quote_failures_total,
            persistence_failures_total,
            notification_failures_total,
            cycle_duration_seconds,
        })
    }

    /// Render all metrics in the Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Write the text exposition to `path` for a textfile collector.
    pub async fn write_textfile(&self, path: &Path) -> std::io::Result<()> {
        let body = self
            .export()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let tmp = path.with_extension("prom.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, path).await
    }
}
