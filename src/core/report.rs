//! Cycle report lines
//!
//! Each line is delivered as its own notification, in order.

use crate::config::TrendConfig;
use crate::core::runtime::CycleOutcome;
use chrono::NaiveDate;

pub const SEPARATOR: &str = "----------------------------------";
pub const NO_ACTIONS: &str = "NO ACTIONS TAKEN TODAY";

fn header(date: NaiveDate) -> String {
    format!("[{}]", date.format("%Y-%m-%d"))
}

fn footer(date: NaiveDate) -> String {
    format!("[END FOR {}]", date.format("%Y-%m-%d"))
}

fn value(v: Option<f64>) -> String {
    v.map(|v| format!("{:.6}", v))
        .unwrap_or_else(|| "n/a".to_string())
}

pub fn build_report(outcome: &CycleOutcome, trend: &TrendConfig) -> Vec<String> {
    let mut lines = vec![SEPARATOR.to_string(), header(outcome.date)];

    if let Some(reason) = &outcome.load_error {
        lines.push(format!("STATE NOT LOADED: {}", reason));
    }

    for summary in &outcome.processed {
        let state = &summary.state;
        lines.push(format!(
            "FOR {} ({})",
            summary.ticker.to_uppercase(),
            summary.method.label()
        ));
        lines.push(format!(
            "PREVIOUS: {} MA: {}  {} MA: {}",
            trend.short_window,
            value(state.prev_short_trend),
            trend.long_window,
            value(state.prev_long_trend)
        ));
        lines.push(format!(
            "CURRENT: {} MA: {}  {} MA: {}",
            trend.short_window,
            value(state.short_trend),
            trend.long_window,
            value(state.long_trend)
        ));
    }

    for skipped in &outcome.skipped {
        lines.push(format!(
            "SKIPPED {}: {}",
            skipped.ticker.to_uppercase(),
            skipped.reason
        ));
    }

    if outcome.trades.is_empty() {
        lines.push(NO_ACTIONS.to_string());
    } else {
        lines.extend(outcome.trades.iter().map(|t| t.description.clone()));
    }

    for failed in &outcome.failed_trades {
        lines.push(format!(
            "TRADE NOT OPENED FOR {}: {}",
            failed.ticker.to_uppercase(),
            failed.reason
        ));
    }

    if let Some(reason) = &outcome.persistence_error {
        lines.push(format!("STATE NOT SAVED: {}", reason));
    }

    if let Some(reason) = &outcome.commit_pending {
        lines.push(format!(
            "STATE SAVED TO JOURNAL, DOCUMENTS UPDATE ON NEXT RUN: {}",
            reason
        ));
    }

    lines.push(footer(outcome.date));
    lines
}
