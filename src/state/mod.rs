//! In-memory ticker state collection, owned by a cycle

use crate::models::ticker_state::TickerState;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ticker symbol -> trend state. Serialized as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerStateStore {
    states: BTreeMap<String, TickerState>,
}

impl TickerStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ticker: &str) -> Option<&TickerState> {
        self.states.get(ticker)
    }

    /// Current state, or the uninitialized sentinel for an unseen ticker
    pub fn state_or_default(&self, ticker: &str) -> TickerState {
        self.states.get(ticker).cloned().unwrap_or_default()
    }

    /// Insert an uninitialized entry for a ticker that has none.
    pub fn ensure(&mut self, ticker: &str) -> &TickerState {
        self.states.entry(ticker.to_string()).or_default()
    }

    /// Record this cycle's trend values for a ticker.
    pub fn update(
        &mut self,
        ticker: &str,
        short_value: f64,
        long_value: f64,
        date: NaiveDate,
    ) -> &TickerState {
        let state = self.states.entry(ticker.to_string()).or_default();
        state.advance(short_value, long_value, date);
        state
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TickerState)> {
        self.states.iter()
    }
}

impl FromIterator<(String, TickerState)> for TickerStateStore {
    fn from_iter<I: IntoIterator<Item = (String, TickerState)>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}
