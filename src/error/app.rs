use thiserror::Error;

use super::{ConfigError, MeasureError, ReportError, StoreError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("HTTP client error: {source}")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Measurement error: {0}")]
    Measure(#[from] MeasureError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
    #[error("{failed} of {total} report(s) failed.")]
    ReportsFailed { failed: usize, total: usize },
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn measure<E>(error: E) -> Self
    where
        E: Into<MeasureError>,
    {
        error.into().into()
    }

    pub fn store<E>(error: E) -> Self
    where
        E: Into<StoreError>,
    {
        error.into().into()
    }

    pub fn report<E>(error: E) -> Self
    where
        E: Into<ReportError>,
    {
        error.into().into()
    }
}
