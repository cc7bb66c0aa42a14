use chrono::NaiveDate;
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;

use crate::error::{BacktestError, EngineResult};
use crate::models::{PerformanceMetrics, RiskMetrics, SimulationPoint};

/// Reduces a simulated trajectory to summary statistics.
///
/// Every ratio is computed from the realized series; nothing is read back
/// from the profile's reference figures.
#[derive(Debug, Clone, Copy)]
pub struct RiskMetricsCalculator {
    /// Annual risk-free rate as a decimal (0.02 = 2%).
    risk_free_rate: f64,
    /// Return periods per year used to annualize daily figures.
    periods_per_year: f64,
}

impl Default for RiskMetricsCalculator {
    fn default() -> Self {
        Self::new(0.0, 365.0)
    }
}

impl RiskMetricsCalculator {
    pub fn new(risk_free_rate: f64, periods_per_year: f64) -> Self {
        Self {
            risk_free_rate,
            periods_per_year,
        }
    }

    pub fn compute(
        &self,
        points: &[SimulationPoint],
        initial_investment: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> EngineResult<RiskMetrics> {
        if initial_investment == 0.0 {
            return Err(BacktestError::DivisionByZero(
                "initial investment is zero".to_string(),
            ));
        }
        let duration_days = (end_date - start_date).num_days();
        if duration_days <= 0 {
            return Err(BacktestError::DivisionByZero(format!(
                "date range {}..{} spans no days",
                start_date, end_date
            )));
        }

        let final_value = points
            .last()
            .map(|p| p.portfolio_value)
            .unwrap_or(initial_investment);

        let total_return_pct = (final_value - initial_investment) / initial_investment * 100.0;

        // A non-positive ending ratio has no real root; report it as a total loss.
        let growth = final_value / initial_investment;
        let annualized_return_pct = if growth > 0.0 {
            (growth.powf(365.0 / duration_days as f64) - 1.0) * 100.0
        } else {
            -100.0
        };

        let values: Vec<f64> = points.iter().map(|p| p.portfolio_value).collect();
        let max_drawdown_pct = Self::max_drawdown_pct(&values);

        let daily_returns: Vec<f64> = points.iter().skip(1).map(|p| p.daily_return).collect();
        let performance = self.performance(&daily_returns, annualized_return_pct, max_drawdown_pct);

        Ok(RiskMetrics {
            final_value,
            total_return_pct,
            annualized_return_pct,
            max_drawdown_pct,
            performance,
        })
    }

    /// Percentage below the running peak at every point, within 0..=100.
    ///
    /// Points reached while the running peak is not positive contribute 0.
    pub fn drawdown_series(values: &[f64]) -> Vec<f64> {
        let mut peak = f64::NEG_INFINITY;
        values
            .iter()
            .map(|&value| {
                if value > peak {
                    peak = value;
                }
                if peak > 0.0 {
                    ((peak - value) / peak * 100.0).clamp(0.0, 100.0)
                } else {
                    0.0
                }
            })
            .collect()
    }

    pub fn max_drawdown_pct(values: &[f64]) -> f64 {
        Self::drawdown_series(values)
            .into_iter()
            .fold(0.0, f64::max)
    }

    pub fn performance(
        &self,
        daily_returns: &[f64],
        annualized_return_pct: f64,
        max_drawdown_pct: f64,
    ) -> PerformanceMetrics {
        if daily_returns.is_empty() {
            return PerformanceMetrics::default();
        }

        let n = daily_returns.len() as f64;
        let mean = daily_returns.mean();
        // Sample standard deviation; undefined for a single observation.
        let std_dev = if daily_returns.len() > 1 {
            daily_returns.std_dev()
        } else {
            0.0
        };
        let rf_daily = self.risk_free_rate / self.periods_per_year;
        let annualizer = self.periods_per_year.sqrt();

        let sharpe_ratio = if std_dev > 0.0 {
            Some((mean - rf_daily) / std_dev * annualizer)
        } else {
            None
        };

        let downside: Vec<f64> = daily_returns
            .iter()
            .filter(|r| **r < rf_daily)
            .map(|r| (r - rf_daily).powi(2))
            .collect();
        let downside_dev = if !downside.is_empty() {
            (downside.iter().sum::<f64>() / downside.len() as f64).sqrt()
        } else {
            0.0
        };
        let sortino_ratio = if downside_dev > 0.0 {
            Some((mean - rf_daily) / downside_dev * annualizer)
        } else {
            None
        };

        let calmar_ratio = if max_drawdown_pct > 0.0 {
            Some(annualized_return_pct / max_drawdown_pct)
        } else {
            None
        };

        let winning_days = daily_returns.iter().filter(|r| **r > 0.0).count();
        let best = daily_returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = daily_returns.iter().copied().fold(f64::INFINITY, f64::min);

        let mut sorted = daily_returns.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let historical_var_95_pct = (-percentile_sorted(&sorted, 5.0) * 100.0).max(0.0);

        let parametric_var_95_pct = if std_dev > 0.0 {
            Normal::new(mean, std_dev)
                .ok()
                .map(|normal| (-normal.inverse_cdf(0.05) * 100.0).max(0.0))
        } else {
            None
        };

        PerformanceMetrics {
            sharpe_ratio,
            sortino_ratio,
            calmar_ratio,
            win_rate_pct: winning_days as f64 / n * 100.0,
            best_day_pct: best * 100.0,
            worst_day_pct: worst * 100.0,
            annualized_volatility_pct: std_dev * annualizer * 100.0,
            historical_var_95_pct,
            parametric_var_95_pct,
        }
    }
}

fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}
