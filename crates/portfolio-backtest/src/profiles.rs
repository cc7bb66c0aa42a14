//! Risk profile catalogue
//!
//! Fixed parameters for the three simulated portfolios. Nothing here is
//! mutable; callers receive owned copies.

use crate::error::EngineResult;
use crate::models::{Allocation, ReferenceMetrics, RiskParameters, RiskProfile};

pub struct RiskProfileTable;

impl RiskProfileTable {
    pub fn lookup(profile: RiskProfile) -> RiskParameters {
        match profile {
            RiskProfile::Conservative => RiskParameters {
                profile,
                description: "Low-risk mix weighted towards large caps and stablecoins, \
                              aimed at capital preservation with steady returns."
                    .to_string(),
                daily_return_mean: 0.00035,
                daily_return_std_dev: 0.015,
                reference: ReferenceMetrics {
                    expected_return: 8.5,
                    volatility: 12.3,
                    sharpe_ratio: 0.69,
                    max_drawdown: 15.7,
                    value_at_risk_95: 5.2,
                },
                allocation: Allocation::new(&[
                    ("BTC", 0.30),
                    ("ETH", 0.40),
                    ("USDT", 0.20),
                    ("ADA", 0.10),
                ]),
            },
            RiskProfile::Moderate => RiskParameters {
                profile,
                description: "Balanced mix of the two majors with a smaller slice of \
                              exchange and payment tokens."
                    .to_string(),
                daily_return_mean: 0.00045,
                daily_return_std_dev: 0.022,
                reference: ReferenceMetrics {
                    expected_return: 12.8,
                    volatility: 18.5,
                    sharpe_ratio: 0.72,
                    max_drawdown: 22.4,
                    value_at_risk_95: 8.7,
                },
                allocation: Allocation::new(&[
                    ("BTC", 0.50),
                    ("ETH", 0.30),
                    ("BNB", 0.10),
                    ("XRP", 0.10),
                ]),
            },
            RiskProfile::Aggressive => RiskParameters {
                profile,
                description: "Growth-oriented mix with a large share of higher-beta \
                              smart-contract platforms."
                    .to_string(),
                daily_return_mean: 0.00060,
                daily_return_std_dev: 0.035,
                reference: ReferenceMetrics {
                    expected_return: 18.2,
                    volatility: 28.9,
                    sharpe_ratio: 0.68,
                    max_drawdown: 35.6,
                    value_at_risk_95: 14.3,
                },
                allocation: Allocation::new(&[
                    ("BTC", 0.40),
                    ("ETH", 0.25),
                    ("SOL", 0.20),
                    ("DOT", 0.15),
                ]),
            },
        }
    }

    /// Look up a profile by its (case-insensitive) name.
    ///
    /// Unrecognized names fail with `BacktestError::UnknownProfile` instead of
    /// yielding an empty parameter set.
    pub fn lookup_by_name(name: &str) -> EngineResult<RiskParameters> {
        let profile: RiskProfile = name.parse()?;
        Ok(Self::lookup(profile))
    }

    pub fn all() -> Vec<RiskParameters> {
        RiskProfile::ALL.iter().map(|p| Self::lookup(*p)).collect()
    }
}
