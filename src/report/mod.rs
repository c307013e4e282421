//! Consolidated HTML summary across exchanges.
mod html;


use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use crate::charts::ChartSettings;
use crate::error::ReportError;
use crate::stats::{DEFAULT_PERCENTILE, LatencyStatistics, compute_statistics_at, summarize};
use crate::store::LatencySeries;

pub const SUMMARY_REPORT_FILE: &str = "summary_report.html";
/// Group name for samples written without an endpoint tag.
pub const UNTAGGED_ENDPOINT: &str = "unknown";

#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub chart: ChartSettings,
    pub percentile: f64,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            chart: ChartSettings::default(),
            percentile: DEFAULT_PERCENTILE,
        }
    }
}

impl ReportSettings {
    #[must_use]
    pub fn summary_path(&self) -> PathBuf {
        self.chart.reports_dir.join(SUMMARY_REPORT_FILE)
    }
}

/// Stored series of one exchange, as handed to the report.
#[derive(Debug, Clone)]
pub struct ExchangeSeries {
    pub key: String,
    pub label: String,
    pub series: LatencySeries,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSummary {
    pub endpoint: String,
    pub stats: LatencyStatistics,
}

/// One row of the summary table. `stats` is `None` for exchanges without data.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeSummary {
    pub label: String,
    pub stats: Option<LatencyStatistics>,
    pub endpoints: Vec<EndpointSummary>,
}

impl ExchangeSummary {
    #[must_use]
    pub fn best_endpoint(&self) -> Option<&EndpointSummary> {
        self.endpoints
            .iter()
            .min_by(|a, b| a.stats.mean.total_cmp(&b.stats.mean))
    }

    #[must_use]
    pub fn worst_endpoint(&self) -> Option<&EndpointSummary> {
        self.endpoints
            .iter()
            .max_by(|a, b| a.stats.mean.total_cmp(&b.stats.mean))
    }
}

/// Statistics of one exchange overall and per endpoint tag.
///
/// # Errors
///
/// Returns `InvalidPercentile` when `percentile` is outside `0..=100`.
pub fn summarize_exchange(
    entry: &ExchangeSeries,
    percentile: f64,
) -> Result<ExchangeSummary, ReportError> {
    let stats = match compute_statistics_at(&entry.series, percentile) {
        Ok(stats) => Some(stats),
        Err(ReportError::NoData) => None,
        Err(err) => return Err(err),
    };

    let mut grouped: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for sample in entry.series.iter() {
        let endpoint = sample.endpoint.as_deref().unwrap_or(UNTAGGED_ENDPOINT);
        grouped.entry(endpoint).or_default().push(sample.latency_ms);
    }

    let mut endpoints = Vec::with_capacity(grouped.len());
    for (endpoint, values) in grouped {
        endpoints.push(EndpointSummary {
            endpoint: endpoint.to_owned(),
            stats: summarize(&values, percentile)?,
        });
    }

    Ok(ExchangeSummary {
        label: entry.label.clone(),
        stats,
        endpoints,
    })
}

/// Writes `summary_report.html` into the reports directory.
///
/// # Errors
///
/// Returns `InvalidPercentile`, `Format` or `Io`.
pub fn write_summary_report(
    entries: &[ExchangeSeries],
    settings: &ReportSettings,
) -> Result<PathBuf, ReportError> {
    let summaries = entries
        .iter()
        .map(|entry| summarize_exchange(entry, settings.percentile))
        .collect::<Result<Vec<_>, _>>()?;

    let generated_at = Utc::now().with_timezone(&settings.chart.utc_offset);
    let document = html::render(&summaries, settings.percentile, generated_at)?;

    let dir = &settings.chart.reports_dir;
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.clone(),
        source,
    })?;
    let path = settings.summary_path();
    fs::write(&path, document).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;

    info!("Summary report written to {}", path.display());
    Ok(path)
}
