//! Ticker to quote-symbol mapping

use std::collections::HashMap;

/// Maps watch-list tickers onto the symbols the quote endpoint understands.
///
/// Explicit overrides win. Otherwise a configured suffix (e.g. `-USD`) is
/// stripped. Tickers matching neither are passed through unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteSymbolMap {
    strip_suffix: Option<String>,
    overrides: HashMap<String, String>,
}

impl QuoteSymbolMap {
    pub fn new(strip_suffix: Option<String>, overrides: HashMap<String, String>) -> Self {
        Self {
            strip_suffix: strip_suffix.filter(|s| !s.is_empty()),
            overrides,
        }
    }

    pub fn with_suffix(suffix: &str) -> Self {
        Self::new(Some(suffix.to_string()), HashMap::new())
    }

    pub fn with_override(mut self, ticker: &str, symbol: &str) -> Self {
        self.overrides
            .insert(ticker.to_uppercase(), symbol.to_uppercase());
        self
    }

    pub fn resolve(&self, ticker: &str) -> String {
        let ticker = ticker.trim().to_uppercase();
        if let Some(symbol) = self.overrides.get(&ticker) {
            return symbol.clone();
        }
        if let Some(suffix) = &self.strip_suffix {
            if let Some(root) = ticker.strip_suffix(suffix.to_uppercase().as_str()) {
                if !root.is_empty() {
                    return root.to_string();
                }
            }
        }
        ticker
    }
}
