use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily close from the price history provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendMethod {
    Simple,
    Exponential,
}

impl TrendMethod {
    pub fn label(&self) -> &'static str {
        match self {
            TrendMethod::Simple => "SMA",
            TrendMethod::Exponential => "EMA",
        }
    }
}

/// Short and long trend values computed together in one cycle.
///
/// Both values always come from the same method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendValues {
    pub short: f64,
    pub long: f64,
    pub method: TrendMethod,
}

impl TrendValues {
    pub fn simple(short: f64, long: f64) -> Self {
        Self {
            short,
            long,
            method: TrendMethod::Simple,
        }
    }

    pub fn exponential(short: f64, long: f64) -> Self {
        Self {
            short,
            long,
            method: TrendMethod::Exponential,
        }
    }

    pub fn used_exponential(&self) -> bool {
        self.method == TrendMethod::Exponential
    }
}
