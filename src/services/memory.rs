//! In-memory market data, used for dry runs and tests.

use crate::models::indicators::PricePoint;
use crate::services::error::ProviderError;
use crate::services::market_data::{LiveQuoteProvider, PriceHistoryProvider};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryMarketData {
    history: Arc<RwLock<HashMap<String, Vec<PricePoint>>>>,
    quotes: Arc<RwLock<HashMap<String, f64>>>,
}

impl InMemoryMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_history(&self, ticker: &str, mut points: Vec<PricePoint>) {
        points.sort_by_key(|p| p.date);
        self.history.write().await.insert(ticker.to_string(), points);
    }

    /// Append a close, replacing any existing point for the same date.
    pub async fn push_close(&self, ticker: &str, point: PricePoint) {
        let mut history = self.history.write().await;
        let points = history.entry(ticker.to_string()).or_default();
        points.retain(|p| p.date != point.date);
        points.push(point);
        points.sort_by_key(|p| p.date);
    }

    pub async fn set_quote(&self, ticker: &str, price: f64) {
        self.quotes.write().await.insert(ticker.to_string(), price);
    }
}

#[async_trait::async_trait]
impl PriceHistoryProvider for InMemoryMarketData {
    async fn get_history(
        &self,
        ticker: &str,
        window_days: usize,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        let history = self.history.read().await;
        let points = history
            .get(ticker)
            .ok_or_else(|| ProviderError::UnknownSymbol(ticker.to_string()))?;
        let keep = window_days + 1;
        let start = points.len().saturating_sub(keep);
        Ok(points[start..].to_vec())
    }
}

#[async_trait::async_trait]
impl LiveQuoteProvider for InMemoryMarketData {
    async fn get_quote(&self, ticker: &str) -> Result<f64, ProviderError> {
        self.quotes
            .read()
            .await
            .get(ticker)
            .copied()
            .ok_or_else(|| ProviderError::UnknownSymbol(ticker.to_string()))
    }
}
