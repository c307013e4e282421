use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Persisted series '{path}' is corrupt: {source}")]
    CorruptPersistedSeries {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Latency must be a finite, non-negative number of milliseconds, got {value}.")]
    InvalidLatency { value: f64 },
    #[error("Exchange name '{exchange}' cannot be used as a file name.")]
    InvalidExchangeName { exchange: String },
    #[error("Timestamp {timestamp} is out of range.")]
    InvalidTimestamp { timestamp: i64 },
    #[error("I/O error during {context} of '{path}': {source}")]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize series: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}
