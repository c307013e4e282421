use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{Cli, parse_header};
use crate::charts::{ChartSettings, utc_offset_from_hours};
use crate::error::{AppError, AppResult, ConfigError};
use crate::http::ClientSettings;
use crate::registry::{
    EndpointDescriptor, ExchangeProfile, HttpMethod, Registry, builtin_exchanges, is_valid_key,
};
use crate::report::ReportSettings;
use crate::sampler::SamplingPlan;

use super::types::{ConfigFile, DurationValue, EndpointConfig, ExchangeConfig};

/// Largest offset accepted for report timestamps, in hours.
const MAX_UTC_OFFSET_HOURS: i32 = 23;

/// Everything a run needs, after defaults, config file and CLI flags have
/// been layered.
#[derive(Debug, Clone)]
pub struct Settings {
    pub registry: Registry,
    pub plan: SamplingPlan,
    pub client: ClientSettings,
    pub data_dir: PathBuf,
    pub max_entries: usize,
    pub report: ReportSettings,
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive(value: usize, field: &'static str) -> AppResult<usize> {
    if value == 0 {
        return Err(AppError::config(ConfigError::FieldMustBePositive { field }));
    }
    Ok(value)
}

fn ensure_positive_u32(value: u32, field: &'static str) -> AppResult<u32> {
    if value == 0 {
        return Err(AppError::config(ConfigError::FieldMustBePositive { field }));
    }
    Ok(value)
}

fn config_duration(value: &DurationValue, field: &'static str) -> AppResult<Duration> {
    value
        .to_duration()
        .map_err(|source| AppError::config(ConfigError::InvalidDuration { field, source }))
}

/// Layers built-in defaults, the optional config file and CLI flags.
///
/// A flag given on the command line always wins over the config file.
///
/// # Errors
///
/// Returns an error when a config value is out of range or an exchange
/// definition is invalid.
pub fn resolve_settings(
    cli: &Cli,
    matches: &ArgMatches,
    config: Option<&ConfigFile>,
) -> AppResult<Settings> {
    let measurement = config.and_then(|config| config.measurement.as_ref());
    let storage = config.and_then(|config| config.storage.as_ref());
    let report = config.and_then(|config| config.report.as_ref());

    let mut plan = SamplingPlan {
        num_requests: cli.requests,
        max_retries: cli.retries,
        on_exhausted: cli.on_exhausted,
        budget: None,
    };
    let mut timeout = cli.timeout;
    let mut client = ClientSettings::default();

    if let Some(measurement) = measurement {
        if !is_cli(matches, "requests")
            && let Some(requests) = measurement.requests
        {
            plan.num_requests = ensure_positive(requests, "measurement.requests")?;
        }
        if !is_cli(matches, "retries")
            && let Some(retries) = measurement.retries
        {
            plan.max_retries = ensure_positive(retries, "measurement.retries")?;
        }
        if !is_cli(matches, "on_exhausted")
            && let Some(policy) = measurement.on_exhausted
        {
            plan.on_exhausted = policy;
        }
        if !is_cli(matches, "timeout")
            && let Some(value) = measurement.timeout.as_ref()
        {
            timeout = config_duration(value, "measurement.timeout")?;
        }
        if let Some(value) = measurement.max_measure_duration.as_ref() {
            plan.budget = Some(config_duration(value, "measurement.max_measure_duration")?);
        }
        if let Some(value) = measurement.connect_timeout.as_ref() {
            client.connect_timeout = config_duration(value, "measurement.connect_timeout")?;
        }
        if let Some(user_agent) = measurement.user_agent.clone() {
            client.user_agent = user_agent;
        }
    }

    let mut data_dir = cli.data_dir.clone();
    let mut max_entries = cli.max_entries;
    if let Some(storage) = storage {
        if !is_cli(matches, "data_dir")
            && let Some(dir) = storage.data_dir.as_ref()
        {
            data_dir = PathBuf::from(dir);
        }
        if !is_cli(matches, "max_entries")
            && let Some(entries) = storage.max_entries
        {
            max_entries = ensure_positive(entries, "storage.max_entries")?;
        }
    }

    let mut report_settings = ReportSettings {
        chart: ChartSettings {
            reports_dir: cli.reports_dir.clone(),
            ..ChartSettings::default()
        },
        ..ReportSettings::default()
    };
    if let Some(report) = report {
        if !is_cli(matches, "reports_dir")
            && let Some(dir) = report.reports_dir.as_ref()
        {
            report_settings.chart.reports_dir = PathBuf::from(dir);
        }
        if let Some(percentile) = report.percentile {
            if !(0.0..=100.0).contains(&percentile) {
                return Err(AppError::config(ConfigError::PercentileOutOfRange {
                    value: percentile,
                }));
            }
            report_settings.percentile = percentile;
        }
        if let Some(width) = report.chart_width {
            report_settings.chart.width = ensure_positive_u32(width, "report.chart_width")?;
        }
        if let Some(height) = report.chart_height {
            report_settings.chart.height = ensure_positive_u32(height, "report.chart_height")?;
        }
        if let Some(hours) = report.utc_offset_hours {
            if !(-MAX_UTC_OFFSET_HOURS..=MAX_UTC_OFFSET_HOURS).contains(&hours) {
                return Err(AppError::config(ConfigError::InvalidUtcOffset { value: hours }));
            }
            report_settings.chart.utc_offset = utc_offset_from_hours(hours)
                .ok_or_else(|| AppError::config(ConfigError::InvalidUtcOffset { value: hours }))?;
        }
    }

    let registry = match config.and_then(|config| config.exchanges.as_ref()) {
        Some(exchanges) => build_registry(exchanges, timeout)?,
        None => Registry::new(builtin_exchanges(timeout)),
    };

    Ok(Settings {
        registry,
        plan,
        client,
        data_dir,
        max_entries,
        report: report_settings,
    })
}

/// Builds the registry from `[exchanges.<key>]` tables.
///
/// # Errors
///
/// Returns an error for an empty table, invalid keys, unparsable URLs or
/// headers, and negative latency thresholds.
pub(crate) fn build_registry(
    exchanges: &BTreeMap<String, ExchangeConfig>,
    default_timeout: Duration,
) -> AppResult<Registry> {
    if exchanges.is_empty() {
        return Err(AppError::config(ConfigError::NoExchanges));
    }

    let mut profiles: Vec<ExchangeProfile> = Vec::with_capacity(exchanges.len());
    for (raw_key, exchange) in exchanges {
        if !is_valid_key(raw_key) {
            return Err(AppError::config(ConfigError::InvalidExchangeKey {
                exchange: raw_key.clone(),
            }));
        }
        // Lookups from the command line are case-insensitive.
        let key = raw_key.to_ascii_lowercase();
        if profiles.iter().any(|profile| profile.key == key) {
            return Err(AppError::config(ConfigError::DuplicateExchangeKey {
                exchange: raw_key.clone(),
            }));
        }
        if exchange.endpoints.is_empty() {
            return Err(AppError::config(ConfigError::ExchangeWithoutEndpoints {
                exchange: key.clone(),
            }));
        }

        let label = key.to_ascii_uppercase();
        let name = exchange.name.clone().unwrap_or_else(|| label.clone());
        let description = exchange
            .description
            .clone()
            .unwrap_or_else(|| format!("{} Exchange", name));
        let mut profile = ExchangeProfile::new(&key, &name, &description);
        for (endpoint_key, endpoint) in &exchange.endpoints {
            profile = profile.with_endpoint(build_endpoint(
                &key,
                endpoint_key,
                endpoint,
                default_timeout,
            )?);
        }
        profiles.push(profile);
    }

    Ok(Registry::new(profiles))
}

fn build_endpoint(
    exchange: &str,
    endpoint_key: &str,
    config: &EndpointConfig,
    default_timeout: Duration,
) -> AppResult<EndpointDescriptor> {
    if !is_valid_key(endpoint_key) {
        return Err(AppError::config(ConfigError::InvalidEndpointKey {
            exchange: exchange.to_owned(),
            endpoint: endpoint_key.to_owned(),
        }));
    }

    url::Url::parse(&config.url).map_err(|source| {
        AppError::config(ConfigError::InvalidEndpointUrl {
            exchange: exchange.to_owned(),
            endpoint: endpoint_key.to_owned(),
            url: config.url.clone(),
            source,
        })
    })?;

    let mut headers = BTreeMap::new();
    for header in config.headers.iter().flatten() {
        let (name, value) = parse_header(header).map_err(|source| {
            AppError::config(ConfigError::InvalidHeader {
                exchange: exchange.to_owned(),
                endpoint: endpoint_key.to_owned(),
                source,
            })
        })?;
        headers.insert(name, value);
    }

    if let Some(threshold) = config.latency_threshold_ms
        && !(threshold.is_finite() && threshold >= 0.0)
    {
        return Err(AppError::config(ConfigError::NegativeThreshold {
            exchange: exchange.to_owned(),
            endpoint: endpoint_key.to_owned(),
        }));
    }

    let timeout = match config.timeout.as_ref() {
        Some(value) => config_duration(value, "exchanges.endpoints.timeout")?,
        None => default_timeout,
    };

    Ok(EndpointDescriptor {
        exchange: exchange.to_owned(),
        endpoint_key: endpoint_key.to_owned(),
        url: config.url.clone(),
        method: config.method.unwrap_or(HttpMethod::Get),
        headers,
        body: config.body.clone(),
        timeout,
        latency_threshold_ms: config.latency_threshold_ms,
    })
}
