//! Unit tests for quote symbol mapping

use std::collections::HashMap;
use trendwatch::services::QuoteSymbolMap;

#[test]
fn test_strips_configured_suffix() {
    let map = QuoteSymbolMap::with_suffix("-USD");
    assert_eq!(map.resolve("BTC-USD"), "BTC");
    assert_eq!(map.resolve("DOGE-USD"), "DOGE");
    assert_eq!(map.resolve("MATIC-USD"), "MATIC");
}

#[test]
fn test_input_is_normalized() {
    let map = QuoteSymbolMap::with_suffix("-usd");
    assert_eq!(map.resolve(" eth-usd "), "ETH");
}

#[test]
fn test_override_wins_over_suffix() {
    let map = QuoteSymbolMap::with_suffix("-USD").with_override("IOTA-USD", "MIOTA");
    assert_eq!(map.resolve("IOTA-USD"), "MIOTA");
    assert_eq!(map.resolve("iota-usd"), "MIOTA");
}

#[test]
fn test_unmatched_ticker_passes_through() {
    let map = QuoteSymbolMap::with_suffix("-USD");
    assert_eq!(map.resolve("SOL"), "SOL");
    assert_eq!(map.resolve("BTC-EUR"), "BTC-EUR");
    assert_eq!(map.resolve("-USD"), "-USD");
}

#[test]
fn test_no_suffix_configured() {
    let map = QuoteSymbolMap::default();
    assert_eq!(map.resolve("BTC-USD"), "BTC-USD");

    let empty = QuoteSymbolMap::new(Some(String::new()), HashMap::new());
    assert_eq!(empty, QuoteSymbolMap::default());
}
