use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CrossoverKind {
    /// Golden cross: short trend rose above long trend
    Bullish,
    /// Death cross: short trend fell below long trend
    Bearish,
}

impl fmt::Display for CrossoverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossoverKind::Bullish => write!(f, "BULLISH"),
            CrossoverKind::Bearish => write!(f, "BEARISH"),
        }
    }
}

/// A crossover detected for one ticker in the current cycle. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossoverSignal {
    pub ticker: String,
    pub kind: CrossoverKind,
}

impl CrossoverSignal {
    pub fn new(ticker: impl Into<String>, kind: CrossoverKind) -> Self {
        Self {
            ticker: ticker.into(),
            kind,
        }
    }
}
