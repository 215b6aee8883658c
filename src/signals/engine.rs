//! Moving average engine: SMA on cold start, EMA once a ticker is tracking.

use crate::config::TrendConfig;
use crate::error::CycleError;
use crate::indicators::trend::{calculate_sma, lookback_len, next_ema};
use crate::indicators::IndicatorError;
use crate::models::indicators::TrendValues;
use crate::models::ticker_state::TickerState;
use crate::services::market_data::PriceHistoryProvider;
use std::sync::Arc;
use tracing::debug;

pub struct TrendEngine {
    history: Arc<dyn PriceHistoryProvider>,
    config: TrendConfig,
}

impl TrendEngine {
    pub fn new(history: Arc<dyn PriceHistoryProvider>, config: TrendConfig) -> Self {
        Self { history, config }
    }

    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    fn max_window(&self) -> usize {
        self.config.short_window.max(self.config.long_window)
    }

    /// Compute this cycle's short and long trend values for a ticker.
    ///
    /// A ticker without prior trends gets simple averages for both windows.
    /// A tracking ticker always gets exponential updates for both windows.
    /// Both branches need `max_window + 1` closes. Any shortfall comes back
    /// as `DataUnavailable` and the caller leaves the ticker's state alone.
    pub async fn compute_trend(
        &self,
        ticker: &str,
        state: &TickerState,
    ) -> Result<TrendValues, CycleError> {
        let window = self.max_window();
        let points = self
            .history
            .get_history(ticker, window)
            .await
            .map_err(|e| CycleError::data_unavailable(ticker, e))?;

        let needed = lookback_len(window);
        if points.len() < needed {
            return Err(CycleError::data_unavailable(
                ticker,
                IndicatorError::InsufficientData {
                    needed,
                    available: points.len(),
                },
            ));
        }

        let values = match (state.short_trend, state.long_trend) {
            (Some(prev_short), Some(prev_long)) => {
                let latest = points.last().ok_or_else(|| {
                    CycleError::data_unavailable(ticker, "history returned no closes")
                })?;
                debug!(
                    symbol = %ticker,
                    close = latest.close,
                    date = %latest.date,
                    "TrendEngine: exponential update for {}",
                    ticker
                );
                let short = next_ema(
                    latest.close,
                    prev_short,
                    self.config.smoothing,
                    self.config.short_window,
                )
                .map_err(|e| CycleError::data_unavailable(ticker, e))?;
                let long = next_ema(
                    latest.close,
                    prev_long,
                    self.config.smoothing,
                    self.config.long_window,
                )
                .map_err(|e| CycleError::data_unavailable(ticker, e))?;
                TrendValues::exponential(short, long)
            }
            _ => {
                debug!(
                    symbol = %ticker,
                    count = points.len(),
                    needed,
                    "TrendEngine: cold start for {}, computing simple averages",
                    ticker
                );
                let short = calculate_sma(&points, self.config.short_window)
                    .map_err(|e| CycleError::data_unavailable(ticker, e))?;
                let long = calculate_sma(&points, self.config.long_window)
                    .map_err(|e| CycleError::data_unavailable(ticker, e))?;
                TrendValues::simple(short, long)
            }
        };

        if !values.short.is_finite() || !values.long.is_finite() {
            return Err(CycleError::data_unavailable(
                ticker,
                format!("non-finite trend ({}, {})", values.short, values.long),
            ));
        }
        Ok(values)
    }
}
