use std::collections::VecDeque;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Human-readable form of a sample's timestamp (UTC).
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One persisted latency measurement. Field names match the on-disk format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencySample {
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(rename = "latency")]
    pub latency_ms: f64,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl LatencySample {
    /// Builds a sample, deriving `date` from the timestamp.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTimestamp` when the timestamp cannot be represented.
    pub fn new(
        timestamp: i64,
        latency_ms: f64,
        endpoint: Option<String>,
    ) -> Result<Self, StoreError> {
        let datetime = DateTime::from_timestamp(timestamp, 0)
            .ok_or(StoreError::InvalidTimestamp { timestamp })?;
        Ok(Self {
            timestamp,
            latency_ms,
            date: datetime.format(DATE_FORMAT).to_string(),
            endpoint,
        })
    }
}

/// Time-ordered samples of one exchange, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LatencySeries {
    samples: VecDeque<LatencySample>,
}

impl LatencySeries {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            samples: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LatencySample> {
        self.samples.iter()
    }

    #[must_use]
    pub fn first(&self) -> Option<&LatencySample> {
        self.samples.front()
    }

    #[must_use]
    pub fn last(&self) -> Option<&LatencySample> {
        self.samples.back()
    }

    #[must_use]
    pub fn last_timestamp(&self) -> Option<i64> {
        self.samples.back().map(|sample| sample.timestamp)
    }

    #[must_use]
    pub fn latencies(&self) -> Vec<f64> {
        self.samples.iter().map(|sample| sample.latency_ms).collect()
    }

    /// Appends a sample, evicting the oldest ones so at most `max_entries`
    /// remain.
    pub fn push_bounded(&mut self, sample: LatencySample, max_entries: usize) {
        let max_entries = max_entries.max(1);
        while self.samples.len() >= max_entries {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }
}

impl FromIterator<LatencySample> for LatencySeries {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = LatencySample>,
    {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}
