use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{BacktestError, EngineResult};

/// One of the three fixed risk profiles a portfolio can be simulated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskProfile {
    /// All profiles in table order.
    pub const ALL: [RiskProfile; 3] = [
        RiskProfile::Conservative,
        RiskProfile::Moderate,
        RiskProfile::Aggressive,
    ];
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskProfile::Conservative => write!(f, "Conservative"),
            RiskProfile::Moderate => write!(f, "Moderate"),
            RiskProfile::Aggressive => write!(f, "Aggressive"),
        }
    }
}

impl FromStr for RiskProfile {
    type Err = BacktestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(RiskProfile::Conservative),
            "moderate" => Ok(RiskProfile::Moderate),
            "aggressive" => Ok(RiskProfile::Aggressive),
            _ => Err(BacktestError::UnknownProfile(s.to_string())),
        }
    }
}

/// Long-run reference figures published for a profile, all in percent
/// (the Sharpe ratio is a plain ratio).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMetrics {
    pub expected_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub value_at_risk_95: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetWeight {
    pub asset: String,
    /// Fraction of the portfolio, 0.0 - 1.0.
    pub weight: f64,
}

/// Target asset mix for a profile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Allocation {
    pub weights: Vec<AssetWeight>,
}

impl Allocation {
    pub fn new(weights: &[(&str, f64)]) -> Self {
        Self {
            weights: weights
                .iter()
                .map(|(asset, weight)| AssetWeight {
                    asset: asset.to_string(),
                    weight: *weight,
                })
                .collect(),
        }
    }

    pub fn weight(&self, asset: &str) -> Option<f64> {
        self.weights
            .iter()
            .find(|w| w.asset.eq_ignore_ascii_case(asset))
            .map(|w| w.weight)
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().map(|w| w.weight).sum()
    }

    /// Return a copy with `asset` set to `weight`, appending the asset if it
    /// is not part of the mix yet.
    pub fn with_weight(&self, asset: &str, weight: f64) -> EngineResult<Allocation> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(BacktestError::InvalidAllocation(format!(
                "weight for {} must be within 0..=1, got {}",
                asset, weight
            )));
        }

        let mut updated = self.clone();
        match updated
            .weights
            .iter_mut()
            .find(|w| w.asset.eq_ignore_ascii_case(asset))
        {
            Some(existing) => existing.weight = weight,
            None => updated.weights.push(AssetWeight {
                asset: asset.to_uppercase(),
                weight,
            }),
        }
        Ok(updated)
    }
}

/// Static description of a risk profile: its daily-return distribution,
/// reference metrics and default allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskParameters {
    pub profile: RiskProfile,
    pub description: String,
    pub daily_return_mean: f64,
    pub daily_return_std_dev: f64,
    pub reference: ReferenceMetrics,
    pub allocation: Allocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContributionFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    #[default]
    None,
}

impl fmt::Display for ContributionFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContributionFrequency::Daily => write!(f, "Daily"),
            ContributionFrequency::Weekly => write!(f, "Weekly"),
            ContributionFrequency::Monthly => write!(f, "Monthly"),
            ContributionFrequency::Yearly => write!(f, "Yearly"),
            ContributionFrequency::None => write!(f, "None"),
        }
    }
}

impl FromStr for ContributionFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(ContributionFrequency::Daily),
            "weekly" => Ok(ContributionFrequency::Weekly),
            "monthly" => Ok(ContributionFrequency::Monthly),
            "yearly" => Ok(ContributionFrequency::Yearly),
            "none" | "" => Ok(ContributionFrequency::None),
            other => Err(format!("unknown contribution frequency: {}", other)),
        }
    }
}

/// Periodic cash injection. With `ContributionFrequency::None` the amount
/// is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContributionSchedule {
    pub frequency: ContributionFrequency,
    #[serde(default)]
    pub amount: f64,
}

impl ContributionSchedule {
    pub fn new(frequency: ContributionFrequency, amount: f64) -> Self {
        Self { frequency, amount }
    }

    /// The amount actually injected on a due date.
    pub fn effective_amount(&self) -> f64 {
        match self.frequency {
            ContributionFrequency::None => 0.0,
            _ => self.amount,
        }
    }
}

fn default_reinvest() -> bool {
    true
}

/// Parameters of a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRequest {
    pub profile: RiskProfile,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_investment: f64,
    #[serde(default)]
    pub contribution_schedule: ContributionSchedule,
    /// Carried through to the result; growth is always compounded.
    #[serde(default = "default_reinvest")]
    pub reinvest: bool,
}

impl BacktestRequest {
    pub fn new(
        profile: RiskProfile,
        start_date: NaiveDate,
        end_date: NaiveDate,
        initial_investment: f64,
    ) -> Self {
        Self {
            profile,
            start_date,
            end_date,
            initial_investment,
            contribution_schedule: ContributionSchedule::default(),
            reinvest: true,
        }
    }

    pub fn with_contributions(mut self, frequency: ContributionFrequency, amount: f64) -> Self {
        self.contribution_schedule = ContributionSchedule::new(frequency, amount);
        self
    }

    pub fn with_profile(mut self, profile: RiskProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Whole days between start and end.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// Portfolio state at the end of one simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationPoint {
    pub date: NaiveDate,
    pub portfolio_value: f64,
    /// Return applied on this day (0 on the first day).
    pub daily_return: f64,
    /// Cash injected before this day's growth.
    pub contribution: f64,
}

/// Ratios derived from the realized daily-return series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub sharpe_ratio: Option<f64>,
    pub sortino_ratio: Option<f64>,
    pub calmar_ratio: Option<f64>,
    /// Share of days with a positive return, 0-100.
    pub win_rate_pct: f64,
    pub best_day_pct: f64,
    pub worst_day_pct: f64,
    pub annualized_volatility_pct: f64,
    /// Loss threshold at the 5th percentile of daily returns, as a positive percent.
    pub historical_var_95_pct: f64,
    /// Same threshold under a normal approximation of the daily returns.
    pub parametric_var_95_pct: Option<f64>,
}

/// Scalar summary of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub final_value: f64,
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
    pub max_drawdown_pct: f64,
    pub performance: PerformanceMetrics,
}

/// Result of a completed backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub request: BacktestRequest,
    pub points: Vec<SimulationPoint>,
    pub final_value: f64,
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
    pub max_drawdown_pct: f64,
    pub total_contributions: f64,
    /// Initial investment plus every contribution.
    pub total_invested: f64,
    pub gain_on_invested_pct: f64,
    pub performance: PerformanceMetrics,
}
