use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::format::{format_compact_usd, parse_compact_usd};

/// One coin in the market overview table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRow {
    pub name: String,
    pub symbol: String,
    pub price: Decimal,
    pub change_1h_percent: f64,
    pub change_24h_percent: f64,
    pub change_7d_percent: f64,
    /// USD. Snapshot files may also give it as `"$1.80T"`.
    #[serde(deserialize_with = "usd_amount")]
    pub market_cap: f64,
    /// USD
    #[serde(deserialize_with = "usd_amount")]
    pub volume_24h: f64,
}

fn usd_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    Ok(match Amount::deserialize(deserializer)? {
        Amount::Number(n) => n,
        Amount::Text(text) => parse_compact_usd(&text),
    })
}

/// Rows returned by one provider, tagged with where and when they came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub source: String,
    pub fetched_at: DateTime<Utc>,
    pub rows: Vec<MarketRow>,
    /// Symbols the provider did not return, filled in from the sample table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backfilled: Vec<String>,
}

impl MarketSnapshot {
    pub fn row(&self, symbol: &str) -> Option<&MarketRow> {
        self.rows.iter().find(|r| r.symbol.eq_ignore_ascii_case(symbol))
    }

    /// The `n` largest rows by market cap.
    pub fn top_by_market_cap(&self, n: usize) -> Vec<&MarketRow> {
        let mut rows: Vec<&MarketRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| {
            b.market_cap
                .partial_cmp(&a.market_cap)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows.truncate(n);
        rows
    }

    /// Table rows plus the two chart series the dashboard shows: the `top_n`
    /// largest market caps and the 7-day change of the first `weekly_n`
    /// rows.
    pub fn overview(&self, top_n: usize, weekly_n: usize) -> MarketOverview {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| OverviewRow {
                rank: i + 1,
                name: row.name.clone(),
                symbol: row.symbol.clone(),
                price: row.price,
                change_1h_percent: row.change_1h_percent,
                change_24h_percent: row.change_24h_percent,
                change_7d_percent: row.change_7d_percent,
                market_cap_display: format_compact_usd(row.market_cap),
                volume_24h_display: format_compact_usd(row.volume_24h),
            })
            .collect();

        MarketOverview {
            source: self.source.clone(),
            fetched_at: self.fetched_at,
            rows,
            top_market_caps: self
                .top_by_market_cap(top_n)
                .into_iter()
                .map(|r| MarketCapBar {
                    name: r.name.clone(),
                    market_cap: r.market_cap,
                })
                .collect(),
            weekly_performance: self
                .rows
                .iter()
                .take(weekly_n)
                .map(|r| WeeklyBar {
                    symbol: r.symbol.clone(),
                    change_7d_percent: r.change_7d_percent,
                })
                .collect(),
        }
    }
}

/// A `MarketRow` ready for display, with compact USD strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewRow {
    pub rank: usize,
    pub name: String,
    pub symbol: String,
    pub price: Decimal,
    pub change_1h_percent: f64,
    pub change_24h_percent: f64,
    pub change_7d_percent: f64,
    pub market_cap_display: String,
    pub volume_24h_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketCapBar {
    pub name: String,
    pub market_cap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyBar {
    pub symbol: String,
    pub change_7d_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketOverview {
    pub source: String,
    pub fetched_at: DateTime<Utc>,
    pub rows: Vec<OverviewRow>,
    pub top_market_caps: Vec<MarketCapBar>,
    pub weekly_performance: Vec<WeeklyBar>,
}
