use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("insufficient data: need {needed} closes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    #[error("window must be at least 1")]
    ZeroWindow,

    #[error("non-finite value in input: {0}")]
    NonFinite(f64),
}
