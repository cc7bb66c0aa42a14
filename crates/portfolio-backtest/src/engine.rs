use chrono::NaiveDate;
use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::error::{BacktestError, EngineResult};
use crate::metrics::RiskMetricsCalculator;
use crate::models::*;
use crate::profiles::RiskProfileTable;
use crate::returns::ReturnGenerator;
use crate::simulator::PortfolioSimulator;

/// Deterministic portfolio backtester: validates a request, draws seeded
/// daily returns for its profile, compounds them with the contribution
/// schedule and summarizes the trajectory.
///
/// The engine holds no mutable state; one instance can serve any number of
/// concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct BacktestEngine {
    config: EngineConfig,
}

impl BacktestEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reject malformed requests before any computation happens.
    pub fn validate(&self, request: &BacktestRequest) -> EngineResult<()> {
        let (start, end) = (request.start_date, request.end_date);
        if end <= start {
            return Err(BacktestError::InvalidDateRange {
                start,
                end,
                reason: "end date must be after start date".to_string(),
            });
        }

        let days = request.duration_days();
        if days < self.config.min_window_days {
            return Err(BacktestError::InvalidDateRange {
                start,
                end,
                reason: format!(
                    "window of {} days is shorter than the {}-day minimum",
                    days, self.config.min_window_days
                ),
            });
        }
        if days > self.config.max_window_days {
            return Err(BacktestError::InvalidDateRange {
                start,
                end,
                reason: format!(
                    "window of {} days exceeds the {}-day maximum",
                    days, self.config.max_window_days
                ),
            });
        }

        let investment = request.initial_investment;
        if !investment.is_finite() || investment <= 0.0 {
            return Err(BacktestError::InvalidInvestment(investment));
        }

        let amount = request.contribution_schedule.effective_amount();
        if !amount.is_finite() || amount < 0.0 {
            return Err(BacktestError::InvalidContribution(amount));
        }

        Ok(())
    }

    /// Run one backtest. Nothing is simulated if validation fails.
    pub fn run(&self, request: BacktestRequest) -> EngineResult<BacktestResult> {
        self.validate(&request)?;

        tracing::info!(
            "Running backtest: {} {}..{} initial ${:.2}, {} contributions of ${:.2}",
            request.profile,
            request.start_date,
            request.end_date,
            request.initial_investment,
            request.contribution_schedule.frequency,
            request.contribution_schedule.effective_amount()
        );

        let params = RiskProfileTable::lookup(request.profile);
        let dates = daily_dates(request.start_date, request.end_date);
        let returns = ReturnGenerator::generate_with(&params, dates.len(), self.config.seed)?;
        let points = PortfolioSimulator::simulate(
            request.initial_investment,
            &returns,
            &dates,
            &request.contribution_schedule,
        );

        let calculator =
            RiskMetricsCalculator::new(self.config.risk_free_rate, self.config.periods_per_year);
        let metrics = calculator.compute(
            &points,
            request.initial_investment,
            request.start_date,
            request.end_date,
        )?;

        let total_contributions: f64 = points.iter().map(|p| p.contribution).sum();
        let total_invested = request.initial_investment + total_contributions;
        let gain_on_invested_pct = (metrics.final_value - total_invested) / total_invested * 100.0;

        tracing::info!(
            "Backtest complete: {} final ${:.2} ({:+.2}%), max drawdown {:.2}%",
            request.profile,
            metrics.final_value,
            metrics.total_return_pct,
            metrics.max_drawdown_pct
        );

        Ok(BacktestResult {
            request,
            points,
            final_value: metrics.final_value,
            total_return_pct: metrics.total_return_pct,
            annualized_return_pct: metrics.annualized_return_pct,
            max_drawdown_pct: metrics.max_drawdown_pct,
            total_contributions,
            total_invested,
            gain_on_invested_pct,
            performance: metrics.performance,
        })
    }

    /// Run `request` under every risk profile, in parallel.
    ///
    /// Results come back in `RiskProfile::ALL` order and match what
    /// sequential `run` calls would return.
    pub fn compare_profiles(&self, request: &BacktestRequest) -> EngineResult<Vec<BacktestResult>> {
        self.validate(request)?;

        RiskProfile::ALL
            .par_iter()
            .map(|profile| self.run(request.clone().with_profile(*profile)))
            .collect()
    }
}

/// Every calendar day from `start` to `end`, inclusive.
fn daily_dates(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let n = (end - start).num_days().max(-1) + 1;
    start.iter_days().take(n as usize).collect()
}
