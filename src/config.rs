//! Runtime configuration, read from the environment (after `dotenvy`
//! has loaded any `.env` file).

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./budget_alerts.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_LOG_FILE: &str = "budget_alerts.log";

/// Coalescing window for bursts of refresh triggers.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
/// Alerts shown at once before the "and N more" line.
pub const DEFAULT_MAX_VISIBLE: usize = 5;

/// Knobs of the alert engine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertConfig {
    pub debounce: Duration,
    pub max_visible: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            max_visible: DEFAULT_MAX_VISIBLE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub log_file: String,
    pub alerts: AlertConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let log_file = lookup("LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR '{bind_raw}': {e}")))?;

        let debounce = match lookup("ALERT_DEBOUNCE_MS") {
            Some(raw) => Duration::from_millis(parse_number(&raw, "ALERT_DEBOUNCE_MS")?),
            None => DEFAULT_DEBOUNCE,
        };

        let max_visible = match lookup("ALERT_MAX_VISIBLE") {
            Some(raw) => parse_number::<usize>(&raw, "ALERT_MAX_VISIBLE")?,
            None => DEFAULT_MAX_VISIBLE,
        };
        if max_visible == 0 {
            return Err(AppError::Config("ALERT_MAX_VISIBLE must be at least 1".into()));
        }

        Ok(Self {
            database_url,
            bind_addr,
            log_file,
            alerts: AlertConfig { debounce, max_visible },
        })
    }
}

fn parse_number<T>(raw: &str, key: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| AppError::Config(format!("{key} '{raw}': {e}")))
}
