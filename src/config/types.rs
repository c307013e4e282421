use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::DurationError;
use crate::registry::HttpMethod;
use crate::sampler::SlotExhaustion;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub measurement: Option<MeasurementConfig>,
    pub storage: Option<StorageConfig>,
    pub report: Option<ReportConfig>,
    /// Replaces the built-in exchanges when present.
    pub exchanges: Option<BTreeMap<String, ExchangeConfig>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MeasurementConfig {
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub requests: Option<usize>,
    pub retries: Option<usize>,
    pub on_exhausted: Option<SlotExhaustion>,
    pub max_measure_duration: Option<DurationValue>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    pub data_dir: Option<String>,
    pub max_entries: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportConfig {
    pub reports_dir: Option<String>,
    pub percentile: Option<f64>,
    pub chart_width: Option<u32>,
    pub chart_height: Option<u32>,
    pub utc_offset_hours: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExchangeConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub endpoints: BTreeMap<String, EndpointConfig>,
}

#[derive(Debug, Deserialize)]
pub struct EndpointConfig {
    pub url: String,
    pub method: Option<HttpMethod>,
    pub headers: Option<Vec<String>>,
    pub body: Option<String>,
    pub timeout: Option<DurationValue>,
    pub latency_threshold_ms: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, DurationError> {
        match self {
            DurationValue::Seconds(secs) => super::parse::seconds_value(*secs),
            DurationValue::Text(text) => super::parse_duration_value(text),
        }
    }
}
