//! Integration tests for the external providers
//!
//! Yahoo history, CoinMarketCap quotes and webhook delivery, each against a
//! wiremock server.

use chrono::NaiveDate;
use serde_json::{json, Value};
use trendwatch::models::PricePoint;
use trendwatch::services::coinmarketcap::API_KEY_HEADER;
use trendwatch::services::yahoo::calendar_days_for;
use trendwatch::services::{
    CoinMarketCapQuoteProvider, LiveQuoteProvider, NotificationSink, PriceHistoryProvider,
    ProviderError, QuoteSymbolMap, WebhookSink, YahooHistoryProvider,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn session_open(d: u32) -> i64 {
    date(d).and_hms_opt(14, 30, 0).unwrap().and_utc().timestamp()
}

fn chart_body(days: &[u32], closes: &[Option<f64>]) -> Value {
    let timestamps: Vec<i64> = days.iter().map(|d| session_open(*d)).collect();
    json!({
        "chart": {
            "result": [{
                "meta": { "symbol": "XYZ" },
                "timestamp": timestamps,
                "indicators": { "quote": [{ "close": closes }] }
            }],
            "error": null
        }
    })
}

fn cmc_body(symbol: &str, price: f64) -> Value {
    let mut data = serde_json::Map::new();
    data.insert(
        symbol.to_string(),
        json!([{
            "symbol": symbol,
            "quote": { "USD": { "price": price } }
        }]),
    );
    json!({ "status": { "error_code": 0 }, "data": data })
}

// Yahoo

#[tokio::test]
async fn yahoo_returns_latest_closes_oldest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/XYZ"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(
            &[2, 3, 4, 5, 8],
            &[Some(10.0), Some(12.0), None, Some(11.0), Some(13.0)],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let provider = YahooHistoryProvider::with_client(server.uri(), reqwest::Client::new());
    let points = provider.get_history("XYZ", 2).await.unwrap();

    assert_eq!(
        points,
        vec![
            PricePoint::new(date(3), 12.0),
            PricePoint::new(date(5), 11.0),
            PricePoint::new(date(8), 13.0),
        ]
    );
}

#[tokio::test]
async fn yahoo_short_history_is_returned_as_is() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/XYZ"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chart_body(&[2, 3], &[Some(10.0), Some(12.0)])),
        )
        .mount(&server)
        .await;

    let provider = YahooHistoryProvider::with_client(server.uri(), reqwest::Client::new());
    let points = provider.get_history("XYZ", 200).await.unwrap();
    assert_eq!(points.len(), 2);
}

#[tokio::test]
async fn yahoo_unknown_symbol() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/NOPE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        })))
        .mount(&server)
        .await;

    let provider = YahooHistoryProvider::with_client(server.uri(), reqwest::Client::new());
    let err = provider.get_history("NOPE", 2).await.unwrap_err();
    assert!(matches!(err, ProviderError::UnknownSymbol(ref s) if s == "NOPE"));
}

#[tokio::test]
async fn yahoo_error_payload_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/XYZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chart": {
                "result": null,
                "error": { "code": "Bad Request", "description": "Invalid input" }
            }
        })))
        .mount(&server)
        .await;

    let provider = YahooHistoryProvider::with_client(server.uri(), reqwest::Client::new());
    let err = provider.get_history("XYZ", 2).await.unwrap_err();
    assert!(matches!(err, ProviderError::Malformed(_)));
}

#[tokio::test]
async fn yahoo_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let provider = YahooHistoryProvider::with_client(server.uri(), reqwest::Client::new());
    let err = provider.get_history("XYZ", 2).await.unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 500, ref body } if body == "boom"));
}

#[tokio::test]
async fn yahoo_rejects_unrepresentable_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(&[2], &[Some(1.0)])))
        .expect(0)
        .mount(&server)
        .await;

    let provider = YahooHistoryProvider::with_client(server.uri(), reqwest::Client::new());
    for window in [100_000_000_000_000, usize::MAX] {
        let err = provider.get_history("BTC-USD", window).await.unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }
}

#[test]
fn yahoo_pads_calendar_range() {
    assert_eq!(calendar_days_for(5), Some(14));
    assert_eq!(calendar_days_for(201), Some(289));
    assert_eq!(calendar_days_for(usize::MAX), None);
}

// CoinMarketCap

#[tokio::test]
async fn cmc_quote_uses_mapped_symbol_and_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/cryptocurrency/quotes/latest"))
        .and(query_param("symbol", "BTC"))
        .and(header(API_KEY_HEADER, "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cmc_body("BTC", 43250.5)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = CoinMarketCapQuoteProvider::with_client(
        server.uri(),
        "secret",
        QuoteSymbolMap::with_suffix("-USD"),
        reqwest::Client::new(),
    );
    let price = provider.get_quote("BTC-USD").await.unwrap();
    assert_eq!(price, 43250.5);
}

#[tokio::test]
async fn cmc_quote_honours_overrides() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/cryptocurrency/quotes/latest"))
        .and(query_param("symbol", "MIOTA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "MIOTA": { "quote": { "USD": { "price": 0.21 } } } }
        })))
        .mount(&server)
        .await;

    let provider = CoinMarketCapQuoteProvider::with_client(
        server.uri(),
        "secret",
        QuoteSymbolMap::with_suffix("-USD").with_override("IOTA-USD", "MIOTA"),
        reqwest::Client::new(),
    );
    assert_eq!(provider.get_quote("IOTA-USD").await.unwrap(), 0.21);
}

#[tokio::test]
async fn cmc_missing_symbol() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/cryptocurrency/quotes/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .mount(&server)
        .await;

    let provider = CoinMarketCapQuoteProvider::with_client(
        server.uri(),
        "secret",
        QuoteSymbolMap::with_suffix("-USD"),
        reqwest::Client::new(),
    );
    let err = provider.get_quote("XYZ-USD").await.unwrap_err();
    assert!(matches!(err, ProviderError::UnknownSymbol(ref s) if s == "XYZ"));
}

#[tokio::test]
async fn cmc_rejects_non_positive_price() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cmc_body("XYZ", 0.0)))
        .mount(&server)
        .await;

    let provider = CoinMarketCapQuoteProvider::with_client(
        server.uri(),
        "secret",
        QuoteSymbolMap::default(),
        reqwest::Client::new(),
    );
    let err = provider.get_quote("XYZ").await.unwrap_err();
    assert!(matches!(err, ProviderError::Malformed(_)));
}

#[tokio::test]
async fn cmc_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": { "error_code": 1002, "error_message": "API key missing." }
        })))
        .mount(&server)
        .await;

    let provider = CoinMarketCapQuoteProvider::with_client(
        server.uri(),
        "",
        QuoteSymbolMap::default(),
        reqwest::Client::new(),
    );
    let err = provider.get_quote("BTC").await.unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 401, .. }));
}

// Webhook

#[tokio::test]
async fn webhook_posts_content_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(json!({ "content": "NO ACTIONS TAKEN TODAY" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let sink = WebhookSink::with_client(format!("{}/hook", server.uri()), reqwest::Client::new());
    sink.send("NO ACTIONS TAKEN TODAY").await.unwrap();
}

#[tokio::test]
async fn webhook_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let sink = WebhookSink::with_client(format!("{}/hook", server.uri()), reqwest::Client::new());
    let err = sink.send("hello").await.unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 429, .. }));
}
