//! Logging initialization
//!
//! JSON lines in production, colored human-readable output elsewhere. Report
//! lines from `LogSink` are emitted under the `trendwatch::report` target, so
//! `RUST_LOG=trendwatch::report=info` isolates the daily report.

use crate::config::get_environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crate logs at `info`, dependencies (reqwest, hyper) only from `warn`.
pub const DEFAULT_FILTER: &str = "warn,trendwatch=info";

/// Filter directives: `RUST_LOG` when set and non-empty, else [`DEFAULT_FILTER`].
pub fn filter_directives(rust_log: Option<&str>) -> String {
    rust_log
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

pub fn is_json_format(environment: &str) -> bool {
    matches!(environment, "production" | "prod")
}

/// Initialize logging from `APP_ENV` and `RUST_LOG`
pub fn init_logging() {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directives = filter_directives(rust_log.as_deref());
    let env_filter =
        EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if is_json_format(&get_environment()) {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(false)
                    .with_writer(std::io::stdout),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .init();
    }

    tracing::debug!(filter = %directives, "Logging initialized");
}
