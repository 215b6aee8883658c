//! Cycle-level error taxonomy

use crate::db::StoreError;
use thiserror::Error;

/// Failures a cycle can run into.
///
/// `DataUnavailable` is recovered per ticker, `Notification` is logged and
/// dropped. `Persistence` marks the whole cycle as failed.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("notification failure: {0}")]
    Notification(String),
}

impl CycleError {
    pub fn data_unavailable(ticker: &str, reason: impl std::fmt::Display) -> Self {
        Self::DataUnavailable {
            ticker: ticker.to_string(),
            reason: reason.to_string(),
        }
    }
}
