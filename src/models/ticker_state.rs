use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Persisted moving-average state for one watched ticker.
///
/// `None` in the trend slots is the "no prior value" sentinel of a ticker that
/// has never been computed. Once both current trends are set the ticker is
/// tracking and stays that way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerState {
    #[serde(default)]
    pub short_trend: Option<f64>,
    #[serde(default)]
    pub long_trend: Option<f64>,
    #[serde(default)]
    pub prev_short_trend: Option<f64>,
    #[serde(default)]
    pub prev_long_trend: Option<f64>,
    #[serde(default)]
    pub last_computed: Option<NaiveDate>,
}

impl TickerState {
    pub fn is_initialized(&self) -> bool {
        self.short_trend.is_some() && self.long_trend.is_some()
    }

    /// `short - long` for the current cycle
    pub fn spread(&self) -> Option<f64> {
        Some(self.short_trend? - self.long_trend?)
    }

    /// `prev_short - prev_long` for the previous cycle
    pub fn prev_spread(&self) -> Option<f64> {
        Some(self.prev_short_trend? - self.prev_long_trend?)
    }

    /// Shift the current values into the `prev_*` slots and store the new ones.
    ///
    /// On the first computation the previous slots receive the new values, so
    /// the spread cannot change sign on a ticker's first cycle.
    pub fn advance(&mut self, short: f64, long: f64, date: NaiveDate) {
        match (self.short_trend, self.long_trend) {
            (Some(prev_short), Some(prev_long)) => {
                self.prev_short_trend = Some(prev_short);
                self.prev_long_trend = Some(prev_long);
            }
            _ => {
                self.prev_short_trend = Some(short);
                self.prev_long_trend = Some(long);
            }
        }
        self.short_trend = Some(short);
        self.long_trend = Some(long);
        self.last_computed = Some(date);
    }
}
