//! Run a single cycle for today's UTC date and exit.
//!
//! Exits non-zero when the cycle's state could not be loaded or saved.

use chrono::Utc;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use trendwatch::config::Config;
use trendwatch::core::build_runtime;
use trendwatch::logging;
use trendwatch::metrics::Metrics;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env()?;
    let metrics = Arc::new(Metrics::new()?);
    let runtime = build_runtime(&config, metrics)?;

    let date = Utc::now().date_naive();
    let outcome = runtime.run_cycle(date).await;

    info!(
        processed = outcome.processed.len(),
        skipped = outcome.skipped.len(),
        trades = outcome.trades.len(),
        "Cycle for {} complete",
        date
    );

    if let Some(reason) = outcome.load_error.or(outcome.persistence_error) {
        return Err(format!("cycle for {} failed: {}", date, reason).into());
    }
    Ok(())
}
