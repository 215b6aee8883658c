//! Cron-driven cycle scheduler
//!
//! Sleep-then-repeat: the next tick is computed only after the current cycle
//! has finished, so cycles never overlap.

use crate::core::runtime::{CycleOutcome, CycleRuntime};
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Time from `now` until the schedule's next tick.
pub fn next_delay(schedule: &Schedule, now: DateTime<Utc>) -> Option<std::time::Duration> {
    let next = schedule.after(&now).next()?;
    Some((next - now).to_std().unwrap_or_default())
}

pub struct CycleScheduler {
    runtime: Arc<CycleRuntime>,
    schedule: Schedule,
    run_on_start: bool,
}

impl CycleScheduler {
    pub fn new(runtime: Arc<CycleRuntime>, schedule: Schedule, run_on_start: bool) -> Self {
        Self {
            runtime,
            schedule,
            run_on_start,
        }
    }

    /// Run one cycle dated with the current UTC day.
    pub async fn tick(&self) -> CycleOutcome {
        let date = Utc::now().date_naive();
        let outcome = self.runtime.run_cycle(date).await;
        if !outcome.is_success() {
            error!(date = %date, "CycleScheduler: cycle for {} did not commit its state", date);
        }
        outcome
    }

    /// Loop until `shutdown` flips to true (or its sender is dropped).
    ///
    /// A shutdown request that arrives mid-cycle takes effect once that cycle
    /// has persisted and reported.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(run_on_start = self.run_on_start, "CycleScheduler: started");

        if self.run_on_start {
            self.tick().await;
        }

        loop {
            if *shutdown.borrow() {
                break;
            }

            let Some(delay) = next_delay(&self.schedule, Utc::now()) else {
                warn!("CycleScheduler: schedule has no upcoming ticks, stopping");
                break;
            };
            info!(
                sleep_seconds = delay.as_secs(),
                "CycleScheduler: next cycle in {}s",
                delay.as_secs()
            );

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            self.tick().await;
        }

        info!("CycleScheduler: stopped");
    }
}
