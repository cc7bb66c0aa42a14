use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("Invalid date range {start}..{end}: {reason}")]
    InvalidDateRange {
        start: NaiveDate,
        end: NaiveDate,
        reason: String,
    },

    #[error("Initial investment must be a positive finite amount, got {0}")]
    InvalidInvestment(f64),

    #[error("Contribution amount must be a non-negative finite amount, got {0}")]
    InvalidContribution(f64),

    #[error("Unknown risk profile: {0}")]
    UnknownProfile(String),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Invalid allocation: {0}")]
    InvalidAllocation(String),

    #[error("Invalid return distribution: {0}")]
    Distribution(String),
}

impl BacktestError {
    /// True for errors caused by a malformed request (as opposed to a broken
    /// parameter table).
    pub fn is_validation(&self) -> bool {
        !matches!(self, BacktestError::Distribution(_))
    }
}

pub type EngineResult<T> = Result<T, BacktestError>;
