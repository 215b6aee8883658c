//! CoinMarketCap live quote provider

use crate::services::error::ProviderError;
use crate::services::market_data::LiveQuoteProvider;
use crate::services::symbols::QuoteSymbolMap;
use serde_json::Value;
use tracing::debug;

pub const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

pub struct CoinMarketCapQuoteProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    symbols: QuoteSymbolMap,
}

impl CoinMarketCapQuoteProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        symbols: QuoteSymbolMap,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(base_url, api_key, symbols, client))
    }

    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        symbols: QuoteSymbolMap,
        client: reqwest::Client,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            symbols,
        }
    }
}

/// Pull `data[symbol][0].quote.USD.price` out of a quotes/latest payload.
fn extract_price(symbol: &str, body: &Value) -> Result<f64, ProviderError> {
    let entry = match &body["data"][symbol] {
        Value::Array(entries) => entries.first(),
        Value::Object(_) => Some(&body["data"][symbol]),
        _ => None,
    }
    .ok_or_else(|| ProviderError::UnknownSymbol(symbol.to_string()))?;

    let price = entry["quote"]["USD"]["price"]
        .as_f64()
        .ok_or_else(|| ProviderError::Malformed(format!("no USD price for {}", symbol)))?;
    if !price.is_finite() || price <= 0.0 {
        return Err(ProviderError::Malformed(format!(
            "invalid price {} for {}",
            price, symbol
        )));
    }
    Ok(price)
}

#[async_trait::async_trait]
impl LiveQuoteProvider for CoinMarketCapQuoteProvider {
    async fn get_quote(&self, ticker: &str) -> Result<f64, ProviderError> {
        let symbol = self.symbols.resolve(ticker);
        let url = format!("{}/v2/cryptocurrency/quotes/latest", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("symbol", symbol.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        let price = extract_price(&symbol, &body)?;
        debug!(symbol = %ticker, quote_symbol = %symbol, price, "CoinMarketCapQuoteProvider: quote for {}", ticker);
        Ok(price)
    }
}
