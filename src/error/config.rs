use std::path::PathBuf;
use thiserror::Error;

use super::{DurationError, ValidationError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported config extension '{ext}'. Use .toml or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Config file must have .toml or .json extension.")]
    MissingExtension,
    #[error("Config '{field}' must be >= 1.")]
    FieldMustBePositive { field: &'static str },
    #[error("Config '{field}': {source}")]
    InvalidDuration {
        field: &'static str,
        #[source]
        source: DurationError,
    },
    #[error("Config percentile must be within 0..=100, got {value}.")]
    PercentileOutOfRange { value: f64 },
    #[error("Config utc_offset_hours must be within -23..=23, got {value}.")]
    InvalidUtcOffset { value: i32 },
    #[error("No exchanges configured.")]
    NoExchanges,
    #[error("Exchange '{exchange}' defines no endpoints.")]
    ExchangeWithoutEndpoints { exchange: String },
    #[error("Invalid exchange key '{exchange}'. Use ASCII letters, digits, '-' or '_'.")]
    InvalidExchangeKey { exchange: String },
    #[error("Exchange '{exchange}' is defined more than once (keys are case-insensitive).")]
    DuplicateExchangeKey { exchange: String },
    #[error("Invalid endpoint key '{endpoint}' for exchange '{exchange}'.")]
    InvalidEndpointKey { exchange: String, endpoint: String },
    #[error("Invalid header for {exchange}/{endpoint}: {source}")]
    InvalidHeader {
        exchange: String,
        endpoint: String,
        #[source]
        source: ValidationError,
    },
    #[error("Invalid URL '{url}' for {exchange}/{endpoint}: {source}")]
    InvalidEndpointUrl {
        exchange: String,
        endpoint: String,
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Endpoint {exchange}/{endpoint} has a negative latency threshold.")]
    NegativeThreshold { exchange: String, endpoint: String },
}
