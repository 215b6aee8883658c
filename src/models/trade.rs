use crate::models::signal::CrossoverKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const LEDGER_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl From<CrossoverKind> for Direction {
    fn from(kind: CrossoverKind) -> Self {
        match kind {
            CrossoverKind::Bullish => Direction::Long,
            CrossoverKind::Bearish => Direction::Short,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

/// A simulated position opened on a crossover. Immutable once written.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub quantity: u32,
    pub entry_price: f64,
    pub direction: Direction,
}

/// Ledger key: one trade per ticker per day.
///
/// Rendered as `"<YYYY-MM-DD> <ticker>"` in the ledger document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedgerKey {
    pub date: NaiveDate,
    pub ticker: String,
}

impl LedgerKey {
    pub fn new(date: NaiveDate, ticker: impl Into<String>) -> Self {
        Self {
            date,
            ticker: ticker.into(),
        }
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format(LEDGER_DATE_FORMAT), self.ticker)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ledger key {0:?}")]
pub struct InvalidLedgerKey(pub String);

impl FromStr for LedgerKey {
    type Err = InvalidLedgerKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (date, ticker) = s
            .split_once(' ')
            .filter(|(_, ticker)| !ticker.is_empty())
            .ok_or_else(|| InvalidLedgerKey(s.to_string()))?;
        let date = NaiveDate::parse_from_str(date, LEDGER_DATE_FORMAT)
            .map_err(|_| InvalidLedgerKey(s.to_string()))?;
        Ok(Self::new(date, ticker))
    }
}
