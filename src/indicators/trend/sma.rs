//! SMA (Simple Moving Average) indicator

use crate::indicators::error::IndicatorError;
use crate::models::indicators::PricePoint;

/// Number of closes a window of `window` days draws from history.
pub fn lookback_len(window: usize) -> usize {
    window + 1
}

/// Calculate the cold-start SMA for a window.
///
/// Averages the most recent `window + 1` closes. Older points are ignored.
pub fn calculate_sma(points: &[PricePoint], window: usize) -> Result<f64, IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::ZeroWindow);
    }
    let needed = lookback_len(window);
    if points.len() < needed {
        return Err(IndicatorError::InsufficientData {
            needed,
            available: points.len(),
        });
    }

    let recent = &points[points.len() - needed..];
    let mut total = 0.0;
    for point in recent {
        if !point.close.is_finite() {
            return Err(IndicatorError::NonFinite(point.close));
        }
        total += point.close;
    }
    Ok(total / needed as f64)
}
