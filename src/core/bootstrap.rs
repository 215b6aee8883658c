//! Wire a runtime from configuration

use crate::config::Config;
use crate::core::runtime::{CycleRuntime, RuntimeConfig};
use crate::db::JsonStateStore;
use crate::ledger::PositionOpener;
use crate::metrics::Metrics;
use crate::services::{
    CoinMarketCapQuoteProvider, LogSink, NotificationSink, ProviderError, WebhookSink,
    YahooHistoryProvider,
};
use crate::signals::TrendEngine;
use std::sync::Arc;
use tracing::info;

pub fn build_runtime(
    config: &Config,
    metrics: Arc<Metrics>,
) -> Result<CycleRuntime, ProviderError> {
    let history = Arc::new(YahooHistoryProvider::new(config.history_base_url.clone())?);
    let quotes = Arc::new(CoinMarketCapQuoteProvider::new(
        config.quote_base_url.clone(),
        config.quote_api_key.clone(),
        config.quote_symbols.clone(),
    )?);

    let sink: Arc<dyn NotificationSink> = match &config.webhook_url {
        Some(url) => {
            info!("Report delivery: webhook");
            Arc::new(WebhookSink::new(url.clone())?)
        }
        None => {
            info!("Report delivery: log (WEBHOOK_URL not set)");
            Arc::new(LogSink)
        }
    };

    let runtime_config = RuntimeConfig {
        watchlist: config.watchlist.clone(),
        ticker_concurrency: config.ticker_concurrency,
        metrics_textfile: config.metrics_textfile.clone(),
    };

    Ok(CycleRuntime::new(
        runtime_config,
        TrendEngine::new(history, config.trend),
        PositionOpener::new(quotes, config.order_size),
        JsonStateStore::new(config.state_dir.clone()),
        sink,
    )
    .with_metrics(metrics))
}
