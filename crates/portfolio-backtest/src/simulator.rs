use chrono::NaiveDate;

use crate::models::{ContributionSchedule, SimulationPoint};
use crate::schedule::ContributionScheduler;

pub struct PortfolioSimulator;

impl PortfolioSimulator {
    /// Evolve `initial_investment` day by day.
    ///
    /// Day 0 only establishes the balance: its return is recorded as 0 and
    /// never applied. On every later day a due contribution is added to the
    /// previous balance before that day's return compounds it. The previous
    /// point itself is left untouched, so `points[0]` always equals the
    /// initial investment.
    ///
    /// `returns` and `dates` are paired index by index; surplus entries on
    /// either side are ignored. Negative balances are kept as-is.
    pub fn simulate(
        initial_investment: f64,
        returns: &[f64],
        dates: &[NaiveDate],
        schedule: &ContributionSchedule,
    ) -> Vec<SimulationPoint> {
        let n = returns.len().min(dates.len());
        let mut points: Vec<SimulationPoint> = Vec::with_capacity(n);
        if n == 0 {
            return points;
        }

        points.push(SimulationPoint {
            date: dates[0],
            portfolio_value: initial_investment,
            daily_return: 0.0,
            contribution: 0.0,
        });

        let amount = schedule.effective_amount();
        let mut value = initial_investment;

        for i in 1..n {
            let due = ContributionScheduler::is_contribution_due(dates[i], schedule.frequency);
            let contribution = if due && amount != 0.0 { amount } else { 0.0 };

            value = (value + contribution) * (1.0 + returns[i]);

            points.push(SimulationPoint {
                date: dates[i],
                portfolio_value: value,
                daily_return: returns[i],
                contribution,
            });
        }

        points
    }
}
