//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod signal;
pub mod ticker_state;
pub mod trade;

pub use indicators::{PricePoint, TrendMethod, TrendValues};
pub use signal::{CrossoverKind, CrossoverSignal};
pub use ticker_state::TickerState;
pub use trade::{Direction, LedgerKey, TradeRecord};
