//! One cycle: load, compute, detect, trade, persist, report.

use crate::config::TrendConfig;
use crate::core::report::build_report;
use crate::db::{JsonStateStore, StoreError};
use crate::error::CycleError;
use crate::ledger::{OpenedPosition, PositionOpener, TradeLedger};
use crate::metrics::Metrics;
use crate::models::indicators::{TrendMethod, TrendValues};
use crate::models::signal::CrossoverSignal;
use crate::models::ticker_state::TickerState;
use crate::services::notifier::NotificationSink;
use crate::signals::{detect, TrendEngine};
use crate::state::TickerStateStore;
use chrono::NaiveDate;
use futures_util::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Configuration for the cycle runtime
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub watchlist: Vec<String>,
    pub ticker_concurrency: usize,
    pub metrics_textfile: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            watchlist: vec!["BTC-USD".to_string()],
            ticker_concurrency: 4,
            metrics_textfile: None,
        }
    }
}

/// A ticker whose trends were refreshed this cycle
#[derive(Debug, Clone, PartialEq)]
pub struct TickerSummary {
    pub ticker: String,
    pub method: TrendMethod,
    pub state: TickerState,
}

/// A ticker (or trade) dropped this cycle, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: String,
}

impl SkippedTicker {
    fn from_error(ticker: &str, err: &CycleError) -> Self {
        let reason = match err {
            CycleError::DataUnavailable { reason, .. } => reason.clone(),
            other => other.to_string(),
        };
        Self {
            ticker: ticker.to_string(),
            reason,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub date: NaiveDate,
    pub processed: Vec<TickerSummary>,
    pub skipped: Vec<SkippedTicker>,
    pub signals: Vec<CrossoverSignal>,
    pub trades: Vec<OpenedPosition>,
    pub failed_trades: Vec<SkippedTicker>,
    pub load_error: Option<String>,
    pub persistence_error: Option<String>,
    /// Set when the commit is durable in the journal but the documents still
    /// need the next load to roll it forward.
    pub commit_pending: Option<String>,
    pub notification_error: Option<String>,
    pub report: Vec<String>,
}

impl CycleOutcome {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            processed: Vec::new(),
            skipped: Vec::new(),
            signals: Vec::new(),
            trades: Vec::new(),
            failed_trades: Vec::new(),
            load_error: None,
            persistence_error: None,
            commit_pending: None,
            notification_error: None,
            report: Vec::new(),
        }
    }

    /// State was loaded and committed. A journaled commit still awaiting
    /// roll-forward counts as committed. Report delivery does not count.
    pub fn is_success(&self) -> bool {
        self.load_error.is_none() && self.persistence_error.is_none()
    }
}

pub struct CycleRuntime {
    config: RuntimeConfig,
    engine: TrendEngine,
    opener: PositionOpener,
    store: JsonStateStore,
    sink: Arc<dyn NotificationSink>,
    metrics: Option<Arc<Metrics>>,
}

impl CycleRuntime {
    pub fn new(
        config: RuntimeConfig,
        engine: TrendEngine,
        opener: PositionOpener,
        store: JsonStateStore,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            config,
            engine,
            opener,
            store,
            sink,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn trend_config(&self) -> &TrendConfig {
        self.engine.config()
    }

    pub fn store(&self) -> &JsonStateStore {
        &self.store
    }

    /// Run a full cycle for `date`.
    ///
    /// Per-ticker failures are recorded in the outcome and never stop the
    /// cycle. The report is always emitted, even when state failed to load or
    /// save.
    pub async fn run_cycle(&self, date: NaiveDate) -> CycleOutcome {
        let start = Instant::now();
        let mut outcome = CycleOutcome::new(date);
        info!(date = %date, tickers = self.config.watchlist.len(), "CycleRuntime: starting cycle for {}", date);

        match self.store.load().await {
            Ok((mut tickers, mut ledger)) => {
                self.refresh_trends(date, &mut tickers, &mut outcome).await;
                self.detect_signals(&tickers, &mut outcome);
                self.open_positions(date, &mut ledger, &mut outcome).await;

                match self.store.commit(&tickers, &ledger).await {
                    Ok(()) => {}
                    Err(e @ StoreError::PendingRollForward { .. }) => {
                        warn!(date = %date, error = %e, "CycleRuntime: state journaled, documents will be updated on next load");
                        outcome.commit_pending = Some(e.to_string());
                    }
                    Err(e) => {
                        let err = CycleError::from(e);
                        error!(date = %date, error = %err, "CycleRuntime: failed to persist cycle state");
                        if let Some(metrics) = &self.metrics {
                            metrics.persistence_failures_total.inc();
                        }
                        outcome.persistence_error = Some(err.to_string());
                    }
                }
            }
            Err(e) => {
                let err = CycleError::from(e);
                error!(date = %date, error = %err, "CycleRuntime: failed to load state, nothing processed");
                if let Some(metrics) = &self.metrics {
                    metrics.persistence_failures_total.inc();
                }
                outcome.load_error = Some(err.to_string());
            }
        }

        outcome.report = build_report(&outcome, self.engine.config());
        if let Err(e) = self.deliver(&outcome.report).await {
            warn!(date = %date, error = %e, "CycleRuntime: report delivery failed");
            outcome.notification_error = Some(e.to_string());
        }

        self.finish_metrics(&outcome, start).await;
        info!(
            date = %date,
            processed = outcome.processed.len(),
            skipped = outcome.skipped.len(),
            signals = outcome.signals.len(),
            trades = outcome.trades.len(),
            success = outcome.is_success(),
            "CycleRuntime: cycle for {} finished in {:.2}s",
            date,
            start.elapsed().as_secs_f64()
        );
        outcome
    }

    async fn refresh_trends(
        &self,
        date: NaiveDate,
        tickers: &mut TickerStateStore,
        outcome: &mut CycleOutcome,
    ) {
        for ticker in &self.config.watchlist {
            tickers.ensure(ticker);
        }

        let snapshot: &TickerStateStore = tickers;
        let computed: Vec<(String, Result<TrendValues, CycleError>)> =
            stream::iter(self.config.watchlist.iter().cloned())
                .map(|ticker: String| {
                    let state = snapshot.state_or_default(&ticker);
                    async move {
                        let result = self.engine.compute_trend(&ticker, &state).await;
                        (ticker, result)
                    }
                })
                .buffered(self.config.ticker_concurrency.max(1))
                .collect()
                .await;

        for (ticker, result) in computed {
            match result {
                Ok(values) => {
                    let state = tickers.update(&ticker, values.short, values.long, date).clone();
                    debug!(
                        symbol = %ticker,
                        method = values.method.label(),
                        short = values.short,
                        long = values.long,
                        "CycleRuntime: refreshed trends for {}",
                        ticker
                    );
                    if let Some(metrics) = &self.metrics {
                        metrics.tickers_processed_total.inc();
                    }
                    outcome.processed.push(TickerSummary {
                        ticker,
                        method: values.method,
                        state,
                    });
                }
                Err(err) => {
                    warn!(symbol = %ticker, error = %err, "CycleRuntime: skipping {} this cycle", ticker);
                    if let Some(metrics) = &self.metrics {
                        metrics.tickers_skipped_total.inc();
                    }
                    outcome.skipped.push(SkippedTicker::from_error(&ticker, &err));
                }
            }
        }
    }

    /// Only tickers refreshed this cycle are checked; a skipped ticker still
    /// holds last cycle's values and would repeat last cycle's signal.
    fn detect_signals(&self, tickers: &TickerStateStore, outcome: &mut CycleOutcome) {
        for summary in &outcome.processed {
            let Some(state) = tickers.get(&summary.ticker) else {
                continue;
            };
            if let Some(signal) = detect(&summary.ticker, state) {
                info!(symbol = %signal.ticker, kind = %signal.kind, "CycleRuntime: {} crossover on {}", signal.kind, signal.ticker);
                if let Some(metrics) = &self.metrics {
                    let kind = signal.kind.to_string();
                    metrics.signals_total.with_label_values(&[kind.as_str()]).inc();
                }
                outcome.signals.push(signal);
            }
        }
    }

    async fn open_positions(
        &self,
        date: NaiveDate,
        ledger: &mut TradeLedger,
        outcome: &mut CycleOutcome,
    ) {
        for signal in &outcome.signals {
            match self.opener.open_position(signal, ledger, date).await {
                Ok(position) => {
                    if let Some(metrics) = &self.metrics {
                        metrics.trades_opened_total.inc();
                    }
                    outcome.trades.push(position);
                }
                Err(err) => {
                    warn!(symbol = %signal.ticker, error = %err, "CycleRuntime: no position opened for {}", signal.ticker);
                    if let Some(metrics) = &self.metrics {
                        metrics.quote_failures_total.inc();
                    }
                    outcome
                        .failed_trades
                        .push(SkippedTicker::from_error(&signal.ticker, &err));
                }
            }
        }
    }

    /// Send the report line by line, stopping at the first failure.
    async fn deliver(&self, lines: &[String]) -> Result<(), CycleError> {
        for line in lines {
            if let Err(e) = self.sink.send(line).await {
                if let Some(metrics) = &self.metrics {
                    metrics.notification_failures_total.inc();
                }
                return Err(CycleError::Notification(e.to_string()));
            }
        }
        Ok(())
    }

    async fn finish_metrics(&self, outcome: &CycleOutcome, start: Instant) {
        let Some(metrics) = &self.metrics else {
            return;
        };
        metrics.cycles_total.inc();
        if !outcome.is_success() {
            metrics.cycle_failures_total.inc();
        }
        metrics
            .cycle_duration_seconds
            .observe(start.elapsed().as_secs_f64());

        if let Some(path) = &self.config.metrics_textfile {
            if let Err(e) = metrics.write_textfile(path).await {
                warn!(path = %path.display(), error = %e, "CycleRuntime: failed to write metrics textfile");
            }
        }
    }
}
