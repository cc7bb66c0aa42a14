use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::error::SnapshotError;
use crate::source::{SampleSnapshotSource, SnapshotSource};
use crate::types::{MarketRow, MarketSnapshot};

/// Ordered list of snapshot providers. The first one that answers with at
/// least one row wins.
#[derive(Clone, Default)]
pub struct FallbackChain {
    sources: Vec<Arc<dyn SnapshotSource>>,
}

impl FallbackChain {
    pub fn new(sources: Vec<Arc<dyn SnapshotSource>>) -> Self {
        Self { sources }
    }

    pub fn with_source(mut self, source: Arc<dyn SnapshotSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Append the built-in sample table as the final link.
    pub fn with_sample_fallback(self) -> Self {
        self.with_source(Arc::new(SampleSnapshotSource))
    }

    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    pub async fn fetch(&self) -> Result<MarketSnapshot, SnapshotError> {
        let mut failures: Vec<String> = Vec::new();

        for source in &self.sources {
            let name = source.name().to_string();
            match source.fetch_snapshot().await {
                Ok(rows) if !rows.is_empty() => {
                    let (rows, backfilled) = backfill_missing(rows);
                    if !backfilled.is_empty() {
                        tracing::debug!(
                            "{} missing {} symbols, back-filled from sample: {:?}",
                            name,
                            backfilled.len(),
                            backfilled
                        );
                    }
                    tracing::info!("Market snapshot served by {} ({} rows)", name, rows.len());
                    return Ok(MarketSnapshot {
                        source: name,
                        fetched_at: Utc::now(),
                        rows,
                        backfilled,
                    });
                }
                Ok(_) => {
                    let err = SnapshotError::Empty { provider: name };
                    tracing::warn!("{}, trying next source", err);
                    failures.push(err.to_string());
                }
                Err(err) => {
                    tracing::warn!("{}, trying next source", err);
                    failures.push(err.to_string());
                }
            }
        }

        if failures.is_empty() {
            failures.push("no sources configured".to_string());
        }
        Err(SnapshotError::Exhausted(failures.join("; ")))
    }
}

/// Append sample rows for tracked symbols the provider left out.
fn backfill_missing(mut rows: Vec<MarketRow>) -> (Vec<MarketRow>, Vec<String>) {
    let present: HashSet<String> = rows.iter().map(|r| r.symbol.to_uppercase()).collect();
    let mut backfilled = Vec::new();

    for sample in SampleSnapshotSource::rows() {
        if !present.contains(&sample.symbol) {
            backfilled.push(sample.symbol.clone());
            rows.push(sample);
        }
    }

    (rows, backfilled)
}
