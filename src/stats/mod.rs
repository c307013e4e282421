//! Summary statistics over a latency series.

use serde::Serialize;

use crate::error::ReportError;
use crate::store::LatencySeries;

pub const DEFAULT_PERCENTILE: f64 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TailLatency {
    pub percentile: f64,
    pub value_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencyStatistics {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub tail: TailLatency,
}

/// Count, mean, min, max and p95 of a series.
///
/// # Errors
///
/// Returns `NoData` for an empty series.
pub fn compute_statistics(series: &LatencySeries) -> Result<LatencyStatistics, ReportError> {
    compute_statistics_at(series, DEFAULT_PERCENTILE)
}

/// Like [`compute_statistics`] with a custom tail percentile.
///
/// # Errors
///
/// Returns `NoData` for an empty series and `InvalidPercentile` when
/// `percentile` is outside `0..=100`.
pub fn compute_statistics_at(
    series: &LatencySeries,
    percentile: f64,
) -> Result<LatencyStatistics, ReportError> {
    summarize(&series.latencies(), percentile)
}

/// Statistics over raw latency values in milliseconds.
///
/// # Errors
///
/// See [`compute_statistics_at`].
pub fn summarize(values: &[f64], percentile: f64) -> Result<LatencyStatistics, ReportError> {
    if !(0.0..=100.0).contains(&percentile) {
        return Err(ReportError::InvalidPercentile { value: percentile });
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let (Some(min), Some(max)) = (sorted.first().copied(), sorted.last().copied()) else {
        return Err(ReportError::NoData);
    };
    let sum: f64 = sorted.iter().sum();
    let mean = sum / sorted.len() as f64;
    let value_ms = interpolated_percentile(&sorted, percentile).ok_or(ReportError::NoData)?;

    Ok(LatencyStatistics {
        count: sorted.len(),
        mean,
        min,
        max,
        tail: TailLatency {
            percentile,
            value_ms,
        },
    })
}

/// Percentile of ascending `sorted` values, interpolating linearly between
/// the two closest ranks: `rank = p / 100 * (n - 1)`.
#[must_use]
pub fn interpolated_percentile(sorted: &[f64], percentile: f64) -> Option<f64> {
    let last_index = sorted.len().checked_sub(1)?;
    let rank = (percentile / 100.0) * last_index as f64;
    let lower_rank = rank.floor();
    let lower = *sorted.get(lower_rank as usize)?;
    let upper = *sorted.get(rank.ceil() as usize)?;
    Some(lower + (upper - lower) * (rank - lower_rank))
}
