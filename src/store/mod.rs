//! Bounded per-exchange latency time series persisted as JSON.
//!
//! Each exchange owns one file, `<data_dir>/<exchange>_latency_data.json`,
//! holding a pretty-printed array of samples. Every append rewrites the
//! whole file through a temporary sibling and a rename.
//!
//! There is no locking: concurrent appends to the same exchange from several
//! processes race on the rewrite and may lose samples. One writer per
//! exchange is assumed.
mod series;


use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::registry::is_valid_key;

pub use series::{DATE_FORMAT, LatencySample, LatencySeries};

/// Default retention cap per exchange.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

const FILE_SUFFIX: &str = "_latency_data.json";

/// How a `load` obtained its series.
#[derive(Debug)]
pub enum LoadStatus {
    Loaded,
    Missing,
    /// The file exists but does not parse; history is treated as empty.
    Corrupt(StoreError),
    /// The file could not be read (or the exchange name is not usable).
    Unavailable(StoreError),
}

impl LoadStatus {
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, LoadStatus::Corrupt(_))
    }
}

#[derive(Debug, Clone)]
pub struct SeriesStore {
    data_dir: PathBuf,
    max_entries: usize,
}

impl SeriesStore {
    /// A zero cap is raised to one so a fresh sample is always retained.
    pub fn new<P>(data_dir: P, max_entries: usize) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            data_dir: data_dir.into(),
            max_entries: max_entries.max(1),
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub const fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Path of the backing file for an exchange.
    ///
    /// # Errors
    ///
    /// Returns `InvalidExchangeName` when the name is not a safe file stem.
    pub fn series_path(&self, exchange: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_key(exchange) {
            return Err(StoreError::InvalidExchangeName {
                exchange: exchange.to_owned(),
            });
        }
        Ok(self.data_dir.join(format!("{}{}", exchange, FILE_SUFFIX)))
    }

    /// Loads the series for an exchange. Missing, corrupt or unreadable files
    /// yield an empty series.
    #[must_use]
    pub fn load(&self, exchange: &str) -> LatencySeries {
        self.load_with_status(exchange).0
    }

    /// Loads the series and reports which recovery path, if any, was taken.
    #[must_use]
    pub fn load_with_status(&self, exchange: &str) -> (LatencySeries, LoadStatus) {
        let path = match self.series_path(exchange) {
            Ok(path) => path,
            Err(err) => {
                warn!("Cannot load series for '{}': {}", exchange, err);
                return (LatencySeries::new(), LoadStatus::Unavailable(err));
            }
        };

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No latency data at {}", path.display());
                return (LatencySeries::new(), LoadStatus::Missing);
            }
            Err(err) => {
                let err = StoreError::Io {
                    context: "read",
                    path,
                    source: err,
                };
                warn!("{}", err);
                return (LatencySeries::new(), LoadStatus::Unavailable(err));
            }
        };

        // Invalid UTF-8 is a decode failure like any other malformed JSON.
        match serde_json::from_slice::<LatencySeries>(&bytes) {
            Ok(series) => (series, LoadStatus::Loaded),
            Err(err) => {
                let err = StoreError::CorruptPersistedSeries { path, source: err };
                warn!("{}; starting from an empty series", err);
                (LatencySeries::new(), LoadStatus::Corrupt(err))
            }
        }
    }

    /// Appends an untagged sample stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error when the latency is invalid, an existing file cannot
    /// be read or the series cannot be written.
    pub fn append(&self, exchange: &str, latency_ms: f64) -> Result<LatencySample, StoreError> {
        self.append_at(exchange, None, latency_ms, Utc::now())
    }

    /// Appends a sample tagged with the endpoint it was measured on.
    ///
    /// # Errors
    ///
    /// See [`SeriesStore::append`].
    pub fn append_tagged(
        &self,
        exchange: &str,
        endpoint: &str,
        latency_ms: f64,
    ) -> Result<LatencySample, StoreError> {
        self.append_at(exchange, Some(endpoint), latency_ms, Utc::now())
    }

    pub(crate) fn append_at(
        &self,
        exchange: &str,
        endpoint: Option<&str>,
        latency_ms: f64,
        now: DateTime<Utc>,
    ) -> Result<LatencySample, StoreError> {
        if !latency_ms.is_finite() || latency_ms < 0.0 {
            return Err(StoreError::InvalidLatency { value: latency_ms });
        }
        let path = self.series_path(exchange)?;

        // A file that exists but cannot be read is left untouched.
        let mut series = match self.load_with_status(exchange) {
            (_, LoadStatus::Unavailable(err)) => return Err(err),
            (series, _) => series,
        };
        // Wall clocks can step backwards; the series never does.
        let timestamp = series
            .last_timestamp()
            .map_or(now.timestamp(), |last| last.max(now.timestamp()));
        let sample = LatencySample::new(timestamp, latency_ms, endpoint.map(str::to_owned))?;
        series.push_bounded(sample.clone(), self.max_entries);

        self.persist(&path, &series)?;
        debug!(
            "Saved latency data for {}: {:.2} ms ({} samples)",
            exchange,
            latency_ms,
            series.len()
        );
        Ok(sample)
    }

    fn persist(&self, path: &Path, series: &LatencySeries) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|err| StoreError::Io {
            context: "create directory",
            path: self.data_dir.clone(),
            source: err,
        })?;

        let json = serde_json::to_vec_pretty(series)
            .map_err(|err| StoreError::Serialize { source: err })?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|err| StoreError::Io {
            context: "write",
            path: tmp_path.clone(),
            source: err,
        })?;
        fs::rename(&tmp_path, path).map_err(|err| {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                debug!("Could not remove {}: {}", tmp_path.display(), cleanup);
            }
            StoreError::Io {
                context: "rename",
                path: path.to_path_buf(),
                source: err,
            }
        })
    }
}
