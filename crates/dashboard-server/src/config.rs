use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use portfolio_backtest::EngineConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub engine: EngineConfig,
    /// Empty = allow any origin.
    pub cors_allowed_origins: Vec<String>,
    /// Optional JSON snapshot tried before the built-in sample table.
    pub snapshot_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the process
    /// environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineConfig::default();

        let config = Self {
            bind_addr: parse_or(&lookup, "DASHBOARD_BIND_ADDR", "0.0.0.0:3000".parse()?)?,
            engine: EngineConfig {
                seed: parse_or(&lookup, "BACKTEST_SEED", defaults.seed)?,
                risk_free_rate: parse_or(
                    &lookup,
                    "BACKTEST_RISK_FREE_RATE",
                    defaults.risk_free_rate,
                )?,
                periods_per_year: parse_or(
                    &lookup,
                    "BACKTEST_PERIODS_PER_YEAR",
                    defaults.periods_per_year,
                )?,
                min_window_days: parse_or(
                    &lookup,
                    "BACKTEST_MIN_WINDOW_DAYS",
                    defaults.min_window_days,
                )?,
                max_window_days: parse_or(
                    &lookup,
                    "BACKTEST_MAX_WINDOW_DAYS",
                    defaults.max_window_days,
                )?,
            },
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            snapshot_file: lookup("MARKET_SNAPSHOT_FILE")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        };

        if config.engine.periods_per_year <= 0.0 {
            anyhow::bail!("BACKTEST_PERIODS_PER_YEAR must be positive");
        }
        if config.engine.min_window_days < 1 {
            anyhow::bail!("BACKTEST_MIN_WINDOW_DAYS must be at least 1");
        }
        if config.engine.max_window_days < config.engine.min_window_days {
            anyhow::bail!("BACKTEST_MAX_WINDOW_DAYS must not be below BACKTEST_MIN_WINDOW_DAYS");
        }

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        _ => Ok(default),
    }
}
