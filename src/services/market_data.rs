//! Market data provider interfaces.

use crate::models::indicators::PricePoint;
use crate::services::error::ProviderError;

#[async_trait::async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Get daily closes for a ticker, oldest first.
    ///
    /// Implementations should return at least `window_days + 1` points when
    /// the source has them; callers treat fewer as unavailable.
    async fn get_history(
        &self,
        ticker: &str,
        window_days: usize,
    ) -> Result<Vec<PricePoint>, ProviderError>;
}

#[async_trait::async_trait]
pub trait LiveQuoteProvider: Send + Sync {
    /// Get the current spot price for a ticker
    async fn get_quote(&self, ticker: &str) -> Result<f64, ProviderError>;
}
