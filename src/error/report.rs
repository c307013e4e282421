use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("No latency data to compute statistics from.")]
    NoData,
    #[error("No latency samples stored for '{exchange}'.")]
    EmptySeries { exchange: String },
    #[error("Percentile must be within 0..=100, got {value}.")]
    InvalidPercentile { value: f64 },
    #[error("Failed to draw chart '{path}': {message}")]
    Plot { path: PathBuf, message: String },
    #[error("I/O error writing '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to format report: {source}")]
    Format {
        #[source]
        source: std::fmt::Error,
    },
}
