use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    #[error("{provider} unavailable: {reason}")]
    Unavailable { provider: String, reason: String },

    #[error("{provider} returned no rows")]
    Empty { provider: String },

    #[error("All snapshot sources failed: {0}")]
    Exhausted(String),
}
