//! Environment-driven configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file by the binaries. Everything is validated once at startup.

use crate::services::symbols::QuoteSymbolMap;
use cron::Schedule;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_WATCHLIST: &str = "BTC-USD,ETH-USD";
pub const DEFAULT_SHORT_WINDOW: usize = 50;
pub const DEFAULT_LONG_WINDOW: usize = 200;
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 2.0;
/// Largest accepted moving-average window, in days.
pub const MAX_WINDOW: usize = 10_000;
pub const DEFAULT_ORDER_SIZE: u32 = 50;
pub const DEFAULT_CYCLE_SCHEDULE: &str = "0 0 0 * * *";
pub const DEFAULT_HISTORY_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_QUOTE_BASE_URL: &str = "https://pro-api.coinmarketcap.com";
pub const DEFAULT_QUOTE_STRIP_SUFFIX: &str = "-USD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid cron schedule {expr:?}: {reason}")]
    Schedule { expr: String, reason: String },
}

/// Moving-average parameters shared by the trend engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendConfig {
    pub short_window: usize,
    pub long_window: usize,
    pub smoothing: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
            smoothing: DEFAULT_SMOOTHING_FACTOR,
        }
    }
}

impl TrendConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, window) in [
            ("SHORT_WINDOW", self.short_window),
            ("LONG_WINDOW", self.long_window),
        ] {
            if window == 0 {
                return Err(ConfigError::Invalid {
                    key,
                    value: window.to_string(),
                    reason: "window must be at least 1".to_string(),
                });
            }
            if window > MAX_WINDOW {
                return Err(ConfigError::Invalid {
                    key,
                    value: window.to_string(),
                    reason: format!("window must be at most {} days", MAX_WINDOW),
                });
            }
            let weight = self.smoothing / (1.0 + window as f64);
            if !(weight > 0.0 && weight <= 1.0) {
                return Err(ConfigError::Invalid {
                    key: "SMOOTHING_FACTOR",
                    value: self.smoothing.to_string(),
                    reason: format!(
                        "smoothing / (1 + {}) must lie in (0, 1], got {}",
                        window, weight
                    ),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub watchlist: Vec<String>,
    pub trend: TrendConfig,
    pub order_size: u32,
    pub state_dir: PathBuf,
    pub schedule: Schedule,
    pub run_on_start: bool,
    pub ticker_concurrency: usize,
    pub history_base_url: String,
    pub quote_base_url: String,
    pub quote_api_key: String,
    pub quote_symbols: QuoteSymbolMap,
    pub webhook_url: Option<String>,
    pub metrics_textfile: Option<PathBuf>,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = env::vars().collect();
        Self::from_map(&vars)
    }

    /// Build the configuration from an explicit key/value map.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let environment = get("APP_ENV").unwrap_or("sandbox").to_lowercase();

        let watchlist = parse_watchlist(get("WATCHLIST").unwrap_or(DEFAULT_WATCHLIST));
        if watchlist.is_empty() {
            return Err(ConfigError::Invalid {
                key: "WATCHLIST",
                value: String::new(),
                reason: "at least one ticker is required".to_string(),
            });
        }

        let trend = TrendConfig {
            short_window: parse_or(get("SHORT_WINDOW"), "SHORT_WINDOW", DEFAULT_SHORT_WINDOW)?,
            long_window: parse_or(get("LONG_WINDOW"), "LONG_WINDOW", DEFAULT_LONG_WINDOW)?,
            smoothing: parse_or(
                get("SMOOTHING_FACTOR"),
                "SMOOTHING_FACTOR",
                DEFAULT_SMOOTHING_FACTOR,
            )?,
        };
        trend.validate()?;

        let order_size: u32 = parse_or(get("ORDER_SIZE"), "ORDER_SIZE", DEFAULT_ORDER_SIZE)?;
        if order_size == 0 {
            return Err(ConfigError::Invalid {
                key: "ORDER_SIZE",
                value: "0".to_string(),
                reason: "order size must be positive".to_string(),
            });
        }

        let schedule_expr = get("CYCLE_SCHEDULE").unwrap_or(DEFAULT_CYCLE_SCHEDULE);
        let schedule = Schedule::from_str(schedule_expr).map_err(|e| ConfigError::Schedule {
            expr: schedule_expr.to_string(),
            reason: e.to_string(),
        })?;

        let ticker_concurrency: usize =
            parse_or(get("TICKER_CONCURRENCY"), "TICKER_CONCURRENCY", 4)?;

        let overrides = match get("QUOTE_SYMBOL_OVERRIDES") {
            Some(raw) => parse_overrides(raw)?,
            None => HashMap::new(),
        };
        // An explicitly empty QUOTE_STRIP_SUFFIX disables stripping.
        let strip_suffix = match vars.get("QUOTE_STRIP_SUFFIX") {
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(raw.trim().to_string()),
            None => Some(DEFAULT_QUOTE_STRIP_SUFFIX.to_string()),
        };

        Ok(Self {
            environment,
            watchlist,
            trend,
            order_size,
            state_dir: PathBuf::from(get("STATE_DIR").unwrap_or("./data")),
            schedule,
            run_on_start: parse_bool(get("RUN_ON_START"), "RUN_ON_START", true)?,
            ticker_concurrency: ticker_concurrency.max(1),
            history_base_url: get("HISTORY_BASE_URL")
                .unwrap_or(DEFAULT_HISTORY_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            quote_base_url: get("QUOTE_BASE_URL")
                .unwrap_or(DEFAULT_QUOTE_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            quote_api_key: get("QUOTE_API_KEY").unwrap_or_default().to_string(),
            quote_symbols: QuoteSymbolMap::new(strip_suffix, overrides),
            webhook_url: get("WEBHOOK_URL").map(str::to_string),
            metrics_textfile: get("METRICS_TEXTFILE").map(PathBuf::from),
        })
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }
}

/// Get the current environment name (`APP_ENV`, defaults to `sandbox`)
pub fn get_environment() -> String {
    env::var("APP_ENV")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.trim().to_lowercase())
        .unwrap_or_else(|| "sandbox".to_string())
}

fn parse_watchlist(raw: &str) -> Vec<String> {
    let mut tickers: Vec<String> = Vec::new();
    for ticker in raw.split(',').map(|t| t.trim().to_uppercase()) {
        if !ticker.is_empty() && !tickers.contains(&ticker) {
            tickers.push(ticker);
        }
    }
    tickers
}

fn parse_or<T>(raw: Option<&str>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn parse_bool(raw: Option<&str>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match raw.map(|v| v.to_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key,
                value: v,
                reason: "expected a boolean".to_string(),
            }),
        },
    }
}

fn parse_overrides(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut overrides = HashMap::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (ticker, symbol) = pair
            .split_once('=')
            .map(|(t, s)| (t.trim(), s.trim()))
            .filter(|(t, s)| !t.is_empty() && !s.is_empty())
            .ok_or_else(|| ConfigError::Invalid {
                key: "QUOTE_SYMBOL_OVERRIDES",
                value: pair.to_string(),
                reason: "expected TICKER=SYMBOL".to_string(),
            })?;
        overrides.insert(ticker.to_uppercase(), symbol.to_uppercase());
    }
    Ok(overrides)
}
