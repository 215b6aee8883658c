//! EMA (Exponential Moving Average) indicator

use crate::indicators::error::IndicatorError;

/// Weight given to the newest close: `smoothing / (1 + window)`
pub fn smoothing_weight(smoothing: f64, window: usize) -> f64 {
    smoothing / (1.0 + window as f64)
}

/// Advance an EMA by one close.
pub fn next_ema(
    price: f64,
    previous: f64,
    smoothing: f64,
    window: usize,
) -> Result<f64, IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::ZeroWindow);
    }
    for value in [price, previous] {
        if !value.is_finite() {
            return Err(IndicatorError::NonFinite(value));
        }
    }
    let k = smoothing_weight(smoothing, window);
    Ok(price * k + previous * (1.0 - k))
}
