//! Simulated trade ledger
//!
//! No order ever leaves the process. A crossover opens a position at the
//! live quote and the position is written into the ledger under
//! `(cycle date, ticker)`. There is no close or reversal.

use crate::error::CycleError;
use crate::models::signal::CrossoverSignal;
use crate::models::trade::{Direction, InvalidLedgerKey, LedgerKey, TradeRecord};
use crate::services::market_data::LiveQuoteProvider;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// `"<date> <ticker>"` -> trade. Serialized as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeLedger {
    entries: BTreeMap<String, TradeRecord>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a trade, replacing any trade already stored under the same key.
    pub fn record(&mut self, key: &LedgerKey, record: TradeRecord) -> Option<TradeRecord> {
        self.entries.insert(key.to_string(), record)
    }

    pub fn get(&self, key: &LedgerKey) -> Option<&TradeRecord> {
        self.entries.get(&key.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with parsed keys, in key order.
    pub fn entries(&self) -> Result<Vec<(LedgerKey, TradeRecord)>, InvalidLedgerKey> {
        self.entries
            .iter()
            .map(|(key, record)| Ok((key.parse::<LedgerKey>()?, *record)))
            .collect()
    }

    pub fn validate_keys(&self) -> Result<(), InvalidLedgerKey> {
        for key in self.entries.keys() {
            key.parse::<LedgerKey>()?;
        }
        Ok(())
    }
}

/// Result of opening a simulated position
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedPosition {
    pub key: LedgerKey,
    pub record: TradeRecord,
    pub replaced: Option<TradeRecord>,
    pub description: String,
}

pub fn describe(ticker: &str, record: &TradeRecord) -> String {
    format!(
        "<OPENED {} POSITION OF SIZE {} ON ${} AT {}>",
        record.direction,
        record.quantity,
        ticker.to_uppercase(),
        record.entry_price
    )
}

pub struct PositionOpener {
    quotes: Arc<dyn LiveQuoteProvider>,
    order_size: u32,
}

impl PositionOpener {
    pub fn new(quotes: Arc<dyn LiveQuoteProvider>, order_size: u32) -> Self {
        Self { quotes, order_size }
    }

    pub fn order_size(&self) -> u32 {
        self.order_size
    }

    /// Open a position for a crossover signal.
    ///
    /// The entry price is quoted now. When no quote is available nothing is
    /// written and `DataUnavailable` is returned.
    pub async fn open_position(
        &self,
        signal: &CrossoverSignal,
        ledger: &mut TradeLedger,
        date: NaiveDate,
    ) -> Result<OpenedPosition, CycleError> {
        let entry_price = self
            .quotes
            .get_quote(&signal.ticker)
            .await
            .map_err(|e| CycleError::data_unavailable(&signal.ticker, e))?;

        let record = TradeRecord {
            quantity: self.order_size,
            entry_price,
            direction: Direction::from(signal.kind),
        };
        let key = LedgerKey::new(date, signal.ticker.clone());
        let replaced = ledger.record(&key, record);
        let description = describe(&signal.ticker, &record);

        info!(
            symbol = %signal.ticker,
            direction = %record.direction,
            quantity = record.quantity,
            entry_price = record.entry_price,
            replaced = replaced.is_some(),
            "PositionOpener: {}",
            description
        );

        Ok(OpenedPosition {
            key,
            record,
            replaced,
            description,
        })
    }
}
