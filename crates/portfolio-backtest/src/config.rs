use serde::{Deserialize, Serialize};

/// Tunables shared by every run of a `BacktestEngine`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for the daily-return generator. Fixed so runs are reproducible.
    pub seed: u64,
    /// Annual risk-free rate as a decimal, used by Sharpe and Sortino.
    pub risk_free_rate: f64,
    /// Crypto markets trade every calendar day.
    pub periods_per_year: f64,
    /// Shortest accepted simulation window.
    pub min_window_days: i64,
    /// Longest accepted simulation window. Bounds the size of a result.
    pub max_window_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            risk_free_rate: 0.0,
            periods_per_year: 365.0,
            min_window_days: 30,
            max_window_days: 36_525,
        }
    }
}
