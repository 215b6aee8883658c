//! Unit tests for the cold-start SMA

use chrono::{Duration, NaiveDate};
use trendwatch::indicators::{calculate_sma, lookback_len, IndicatorError};
use trendwatch::models::PricePoint;

fn series(closes: &[f64]) -> Vec<PricePoint> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| PricePoint::new(start + Duration::days(i as i64), *close))
        .collect()
}

#[test]
fn test_lookback_is_window_plus_one() {
    assert_eq!(lookback_len(50), 51);
    assert_eq!(lookback_len(1), 2);
}

#[test]
fn test_sma_averages_last_window_plus_one_closes() {
    let points = series(&[10.0, 12.0, 14.0, 11.0, 13.0]);
    let short = calculate_sma(&points, 2).unwrap();
    assert!((short - 38.0 / 3.0).abs() < 1e-12);
    assert!((short - 12.667).abs() < 1e-3);

    let long = calculate_sma(&points, 4).unwrap();
    assert!((long - 12.0).abs() < 1e-12);
}

#[test]
fn test_sma_ignores_older_points() {
    let points = series(&[1000.0, 10.0, 12.0, 14.0, 11.0, 13.0]);
    assert!((calculate_sma(&points, 4).unwrap() - 12.0).abs() < 1e-12);
}

#[test]
fn test_sma_insufficient_data() {
    let points = series(&[10.0, 12.0, 14.0, 11.0]);
    assert_eq!(
        calculate_sma(&points, 4),
        Err(IndicatorError::InsufficientData {
            needed: 5,
            available: 4
        })
    );
}

#[test]
fn test_sma_zero_window() {
    let points = series(&[10.0, 12.0]);
    assert_eq!(calculate_sma(&points, 0), Err(IndicatorError::ZeroWindow));
}

#[test]
fn test_sma_rejects_non_finite_close() {
    let points = series(&[10.0, f64::NAN, 12.0]);
    assert!(matches!(
        calculate_sma(&points, 2),
        Err(IndicatorError::NonFinite(_))
    ));
}
