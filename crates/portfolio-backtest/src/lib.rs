pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod models;
pub mod profiles;
pub mod returns;
pub mod schedule;
pub mod simulator;

pub use config::EngineConfig;
pub use engine::BacktestEngine;
pub use error::{BacktestError, EngineResult};
pub use metrics::RiskMetricsCalculator;
pub use models::*;
pub use profiles::RiskProfileTable;
pub use returns::ReturnGenerator;
pub use schedule::ContributionScheduler;
pub use simulator::PortfolioSimulator;
