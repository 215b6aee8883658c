//! Yahoo Finance daily history provider

use crate::models::indicators::PricePoint;
use crate::services::error::ProviderError;
use crate::services::market_data::PriceHistoryProvider;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::debug;

const USER_AGENT: &str = concat!("trendwatch/", env!("CARGO_PKG_VERSION"));

/// Calendar days to request for `sessions` daily closes.
///
/// Equity markets skip weekends and holidays, so the range is padded.
/// `None` when the padded range does not fit.
pub fn calendar_days_for(sessions: usize) -> Option<i64> {
    let days = sessions.checked_mul(7)?.div_ceil(5).checked_add(7)?;
    i64::try_from(days).ok()
}

pub struct YahooHistoryProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooHistoryProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Turn a chart payload into daily closes, oldest first.
///
/// Null closes are dropped and a later bar for the same day replaces an
/// earlier one.
fn parse_chart(ticker: &str, body: ChartResponse) -> Result<Vec<PricePoint>, ProviderError> {
    if let Some(err) = body.chart.error {
        let code = err.code.unwrap_or_default();
        if code.eq_ignore_ascii_case("Not Found") {
            return Err(ProviderError::UnknownSymbol(ticker.to_string()));
        }
        return Err(ProviderError::Malformed(format!(
            "{}: {}",
            code,
            err.description.unwrap_or_default()
        )));
    }

    let result = body
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| ProviderError::UnknownSymbol(ticker.to_string()))?;
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    if closes.len() != result.timestamp.len() {
        return Err(ProviderError::Malformed(format!(
            "{} timestamps but {} closes",
            result.timestamp.len(),
            closes.len()
        )));
    }

    let mut points: Vec<PricePoint> = Vec::with_capacity(closes.len());
    for (ts, close) in result.timestamp.into_iter().zip(closes) {
        let Some(close) = close.filter(|c| c.is_finite()) else {
            continue;
        };
        let date = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| ProviderError::Malformed(format!("invalid timestamp {}", ts)))?
            .date_naive();
        points.retain(|p| p.date != date);
        points.push(PricePoint::new(date, close));
    }
    points.sort_by_key(|p| p.date);
    Ok(points)
}

#[async_trait::async_trait]
impl PriceHistoryProvider for YahooHistoryProvider {
    async fn get_history(
        &self,
        ticker: &str,
        window_days: usize,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        let out_of_range = || {
            ProviderError::Malformed(format!(
                "history window of {} days is out of range",
                window_days
            ))
        };
        let sessions = window_days.checked_add(1).ok_or_else(out_of_range)?;
        let now = Utc::now();
        let start = calendar_days_for(sessions)
            .and_then(Duration::try_days)
            .and_then(|span| now.checked_sub_signed(span))
            .ok_or_else(out_of_range)?;
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", now.timestamp().to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::UnknownSymbol(ticker.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChartResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        let mut points = parse_chart(ticker, body)?;

        if points.len() > sessions {
            points.drain(..points.len() - sessions);
        }
        debug!(
            symbol = %ticker,
            count = points.len(),
            requested = sessions,
            "YahooHistoryProvider: fetched {} closes for {}",
            points.len(),
            ticker
        );
        Ok(points)
    }
}
