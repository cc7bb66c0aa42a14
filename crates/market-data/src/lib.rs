//! Market Data
//!
//! Snapshot rows for the market overview and the provider chain that
//! produces them. Providers are tried in order and the built-in sample
//! table backs up anything they miss.

pub mod error;
pub mod fallback;
pub mod format;
pub mod source;
pub mod types;

pub use error::SnapshotError;
pub use fallback::FallbackChain;
pub use format::{format_compact_usd, parse_compact_usd};
pub use source::{FileSnapshotSource, SampleSnapshotSource, SnapshotSource};
pub use types::{MarketCapBar, MarketOverview, MarketRow, MarketSnapshot, OverviewRow, WeeklyBar};
