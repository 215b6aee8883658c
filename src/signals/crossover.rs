//! Crossover detection from the sign change of the short/long spread.

use crate::models::signal::{CrossoverKind, CrossoverSignal};
use crate::models::ticker_state::TickerState;

/// Classify the spread change between two cycles.
///
/// Only a strict sign flip counts. A zero spread on either side never fires.
pub fn classify(prev_spread: f64, spread: f64) -> Option<CrossoverKind> {
    if prev_spread < 0.0 && spread > 0.0 {
        Some(CrossoverKind::Bullish)
    } else if prev_spread > 0.0 && spread < 0.0 {
        Some(CrossoverKind::Bearish)
    } else {
        None
    }
}

/// Detect a crossover for a ticker from its stored trend values.
///
/// Uninitialized state yields nothing.
pub fn detect(ticker: &str, state: &TickerState) -> Option<CrossoverSignal> {
    let kind = classify(state.prev_spread()?, state.spread()?)?;
    Some(CrossoverSignal::new(ticker, kind))
}
