use std::path::PathBuf;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::SnapshotError;
use crate::types::MarketRow;

/// Anything that can produce a market overview.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_snapshot(&self) -> Result<Vec<MarketRow>, SnapshotError>;
}

/// Built-in table of the ten tracked coins. Never fails; used as the last
/// link of a fallback chain and to back-fill symbols other providers miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSnapshotSource;

impl SampleSnapshotSource {
    pub const NAME: &'static str = "sample";

    pub fn rows() -> Vec<MarketRow> {
        #[rustfmt::skip]
        let table: [(&str, &str, Decimal, f64, f64, f64, f64, f64); 10] = [
            ("Bitcoin",  "BTC",  dec!(90145.32), -0.09,  0.18,  0.74, 1.80e12,  65.42e9),
            ("Ethereum", "ETH",  dec!(3108.57),  -0.01,  1.15,  2.29, 375.30e9, 10.17e9),
            ("Tether",   "USDT", dec!(1.00),     -0.00, -0.00, -0.00, 186.26e9, 47.51e9),
            ("BNB",      "BNB",  dec!(895.62),    0.32,  2.18,  0.31, 123.36e9, 1.49e9),
            ("Solana",   "SOL",  dec!(289.45),    1.25,  3.45, 15.67, 129.45e9, 3.45e9),
            ("XRP",      "XRP",  dec!(0.78),      0.45,  1.23,  5.43, 45.67e9,  2.34e9),
            ("Cardano",  "ADA",  dec!(0.62),      0.67,  2.34,  8.92, 21.45e9,  0.89e9),
            ("Dogecoin", "DOGE", dec!(0.23),      0.89,  3.21, 12.34, 32.89e9,  1.23e9),
            ("Polkadot", "DOT",  dec!(8.95),      0.32,  1.89,  6.78, 12.34e9,  0.56e9),
            ("Litecoin", "LTC",  dec!(89.45),     0.56,  1.45,  4.56, 6.78e9,   0.78e9),
        ];

        table
            .iter()
            .map(|(name, symbol, price, h1, h24, d7, cap, volume)| MarketRow {
                name: name.to_string(),
                symbol: symbol.to_string(),
                price: *price,
                change_1h_percent: *h1,
                change_24h_percent: *h24,
                change_7d_percent: *d7,
                market_cap: *cap,
                volume_24h: *volume,
            })
            .collect()
    }

    pub fn symbols() -> Vec<String> {
        Self::rows().into_iter().map(|r| r.symbol).collect()
    }
}

#[async_trait]
impl SnapshotSource for SampleSnapshotSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn fetch_snapshot(&self) -> Result<Vec<MarketRow>, SnapshotError> {
        Ok(Self::rows())
    }
}

/// Reads rows from a JSON array on disk, e.g. a snapshot exported by a
/// separate price collector.
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    name: String,
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: format!("file:{}", path.display()),
            path,
        }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_snapshot(&self) -> Result<Vec<MarketRow>, SnapshotError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SnapshotError::Unavailable {
                provider: self.name.clone(),
                reason: e.to_string(),
            })?;

        serde_json::from_str::<Vec<MarketRow>>(&raw).map_err(|e| SnapshotError::Unavailable {
            provider: self.name.clone(),
            reason: format!("malformed snapshot: {}", e),
        })
    }
}
