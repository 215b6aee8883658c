//! trendwatch worker
//!
//! Runs the daily cycle on the configured cron schedule until Ctrl-C.
//! An in-flight cycle finishes persisting and reporting before exit.

use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};
use trendwatch::config::Config;
use trendwatch::core::{build_runtime, CycleScheduler};
use trendwatch::logging;
use trendwatch::metrics::Metrics;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = Config::from_env()?;
    info!("Starting trendwatch worker");
    info!(environment = %config.environment, "Environment");
    info!(
        watchlist = ?config.watchlist,
        short_window = config.trend.short_window,
        long_window = config.trend.long_window,
        smoothing = config.trend.smoothing,
        order_size = config.order_size,
        state_dir = %config.state_dir.display(),
        "Watching {} tickers",
        config.watchlist.len()
    );

    let metrics = Arc::new(Metrics::new()?);
    let runtime = Arc::new(build_runtime(&config, metrics)?);
    let scheduler = CycleScheduler::new(runtime, config.schedule.clone(), config.run_on_start);

    // Held until the scheduler returns. Only a received Ctrl-C sets it.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested, finishing current cycle...");
                let _ = signal_tx.send(true);
            }
            Err(e) => warn!(
                error = %e,
                "Failed to listen for shutdown signal, Ctrl-C will not stop the worker gracefully"
            ),
        }
    });

    scheduler.run(shutdown_rx).await;
    drop(shutdown_tx);
    info!("Worker stopped");
    Ok(())
}
