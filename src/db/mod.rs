//! Durable storage for ticker state and the trade ledger

pub mod json_store;

pub use json_store::{JsonStateStore, StoreError, JOURNAL_FILE, TICKERS_FILE, TRADES_FILE};
