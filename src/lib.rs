//! trendwatch: daily moving-average crossover signals with a simulated trade ledger.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod indicators;
pub mod ledger;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
pub mod state;

pub use error::CycleError;
