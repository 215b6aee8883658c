//! Trend computation and crossover detection.

pub mod crossover;
pub mod engine;

pub use crossover::detect;
pub use engine::TrendEngine;
