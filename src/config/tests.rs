use std::path::Path;
use std::time::Duration;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tempfile::tempdir;

use super::types::{ConfigFile, DurationValue, MeasurementConfig, ReportConfig, StorageConfig};
use super::{find_default_config, load_config_file, parse_duration_value, resolve_settings};
use crate::args::Cli;
use crate::error::{AppError, ConfigError, DurationError};
use crate::registry::HttpMethod;
use crate::sampler::SlotExhaustion;

fn parse_cli(args: &[&str]) -> Result<(Cli, ArgMatches), String> {
    let matches = Cli::command()
        .try_get_matches_from(args)
        .map_err(|err| format!("parse args failed: {}", err))?;
    let cli = Cli::from_arg_matches(&matches).map_err(|err| format!("from matches failed: {}", err))?;
    Ok((cli, matches))
}

fn write_and_load(name: &str, content: &str) -> Result<ConfigFile, String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join(name);
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;
    load_config_file(&path).map_err(|err| err.to_string())
}

#[test]
fn parse_toml_config_with_exchanges() -> Result<(), String> {
    let config = write_and_load(
        "latprobe.toml",
        r#"
[measurement]
timeout = "2s"
requests = 4
retries = 2
on_exhausted = "abort"
max_measure_duration = "1m"

[storage]
data_dir = "/var/lib/latprobe"
max_entries = 500

[report]
percentile = 99.0
utc_offset_hours = 0

[exchanges.kraken]
name = "Kraken"

[exchanges.kraken.endpoints.market_data]
url = "https://api.kraken.com/0/public/Ticker?pair=XBTUSD"
latency_threshold_ms = 250.0

[exchanges.kraken.endpoints.status]
url = "https://api.kraken.com/0/public/SystemStatus"
method = "post"
headers = ["X-Probe: 1"]
body = "{}"
timeout = 3
"#,
    )?;

    let (cli, matches) = parse_cli(&["latprobe"])?;
    let settings = resolve_settings(&cli, &matches, Some(&config)).map_err(|err| err.to_string())?;

    if settings.plan.num_requests != 4 || settings.plan.max_retries != 2 {
        return Err("Unexpected sampling plan".to_owned());
    }
    if settings.plan.on_exhausted != SlotExhaustion::Abort {
        return Err("Expected abort policy".to_owned());
    }
    if settings.plan.budget != Some(Duration::from_secs(60)) {
        return Err("Unexpected measurement budget".to_owned());
    }
    if settings.data_dir != Path::new("/var/lib/latprobe") || settings.max_entries != 500 {
        return Err("Unexpected storage settings".to_owned());
    }
    if (settings.report.percentile - 99.0).abs() > f64::EPSILON {
        return Err("Unexpected percentile".to_owned());
    }
    if settings.report.chart.utc_offset.local_minus_utc() != 0 {
        return Err("Unexpected utc offset".to_owned());
    }

    if settings.registry.len() != 1 || settings.registry.contains("okx") {
        return Err("Config exchanges must replace the built-in ones".to_owned());
    }
    let ticker = settings
        .registry
        .endpoint("kraken", "market_data")
        .map_err(|err| err.to_string())?;
    if ticker.timeout != Duration::from_secs(2) || ticker.latency_threshold_ms != Some(250.0) {
        return Err(format!("Unexpected market_data endpoint: {:?}", ticker));
    }
    let status = settings
        .registry
        .endpoint("kraken", "status")
        .map_err(|err| err.to_string())?;
    if status.method != HttpMethod::Post || status.body.as_deref() != Some("{}") {
        return Err(format!("Unexpected status endpoint: {:?}", status));
    }
    if status.timeout != Duration::from_secs(3) {
        return Err("Endpoint timeout must override the global one".to_owned());
    }
    if status.headers.get("X-Probe").map(String::as_str) != Some("1") {
        return Err("Missing endpoint header".to_owned());
    }
    Ok(())
}

#[test]
fn parse_json_config() -> Result<(), String> {
    let config = write_and_load(
        "latprobe.json",
        r#"{
  "measurement": { "timeout": 5, "user_agent": "probe/1.0" },
  "report": { "reports_dir": "out", "chart_width": 800, "chart_height": 400 }
}"#,
    )?;

    let (cli, matches) = parse_cli(&["latprobe"])?;
    let settings = resolve_settings(&cli, &matches, Some(&config)).map_err(|err| err.to_string())?;
    if settings.client.user_agent != "probe/1.0" {
        return Err("Unexpected user agent".to_owned());
    }
    if settings.report.chart.reports_dir != Path::new("out")
        || settings.report.chart.width != 800
        || settings.report.chart.height != 400
    {
        return Err("Unexpected report settings".to_owned());
    }
    let endpoint = settings
        .registry
        .endpoint("okx", "market_data")
        .map_err(|err| err.to_string())?;
    if endpoint.timeout != Duration::from_secs(5) {
        return Err("Built-in endpoints must use the configured timeout".to_owned());
    }
    Ok(())
}

#[test]
fn resolve_settings_respects_cli_overrides() -> Result<(), String> {
    let config = ConfigFile {
        measurement: Some(MeasurementConfig {
            requests: Some(9),
            timeout: Some(DurationValue::Text("30s".to_owned())),
            ..MeasurementConfig::default()
        }),
        storage: Some(StorageConfig {
            data_dir: Some("from-config".to_owned()),
            max_entries: Some(50),
        }),
        ..ConfigFile::default()
    };

    let (cli, matches) = parse_cli(&[
        "latprobe",
        "--requests",
        "2",
        "--timeout",
        "1s",
        "--data-dir",
        "from-cli",
    ])?;
    let settings = resolve_settings(&cli, &matches, Some(&config)).map_err(|err| err.to_string())?;

    if settings.plan.num_requests != 2 {
        return Err("Expected CLI requests to win".to_owned());
    }
    if settings.data_dir != Path::new("from-cli") {
        return Err("Expected CLI data dir to win".to_owned());
    }
    if settings.max_entries != 50 {
        return Err("Expected config max_entries to apply".to_owned());
    }
    let endpoint = settings
        .registry
        .endpoint("bitget", "book")
        .map_err(|err| err.to_string())?;
    if endpoint.timeout != Duration::from_secs(1) {
        return Err("Expected CLI timeout to win".to_owned());
    }
    Ok(())
}

#[test]
fn resolve_settings_without_config_uses_builtins() -> Result<(), String> {
    let (cli, matches) = parse_cli(&["latprobe"])?;
    let settings = resolve_settings(&cli, &matches, None).map_err(|err| err.to_string())?;
    if settings.registry.exchange_keys().collect::<Vec<_>>() != vec!["bitget", "okx"] {
        return Err("Unexpected built-in exchanges".to_owned());
    }
    if (settings.report.percentile - 95.0).abs() > f64::EPSILON {
        return Err("Unexpected default percentile".to_owned());
    }
    if settings.report.chart.utc_offset.local_minus_utc() != 8 * 3600 {
        return Err("Unexpected default offset".to_owned());
    }
    Ok(())
}

fn expect_config_error<F>(config: &ConfigFile, check: F) -> Result<(), String>
where
    F: Fn(&ConfigError) -> bool,
{
    let (cli, matches) = parse_cli(&["latprobe"])?;
    match resolve_settings(&cli, &matches, Some(config)) {
        Err(AppError::Config(err)) if check(&err) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected config error".to_owned()),
    }
}

#[test]
fn resolve_settings_rejects_out_of_range_values() -> Result<(), String> {
    let zero_requests = ConfigFile {
        measurement: Some(MeasurementConfig {
            requests: Some(0),
            ..MeasurementConfig::default()
        }),
        ..ConfigFile::default()
    };
    expect_config_error(&zero_requests, |err| {
        matches!(err, ConfigError::FieldMustBePositive { field } if *field == "measurement.requests")
    })?;

    let percentile = ConfigFile {
        report: Some(ReportConfig {
            percentile: Some(101.0),
            ..ReportConfig::default()
        }),
        ..ConfigFile::default()
    };
    expect_config_error(&percentile, |err| {
        matches!(err, ConfigError::PercentileOutOfRange { .. })
    })?;

    let offset = ConfigFile {
        report: Some(ReportConfig {
            utc_offset_hours: Some(24),
            ..ReportConfig::default()
        }),
        ..ConfigFile::default()
    };
    expect_config_error(&offset, |err| {
        matches!(err, ConfigError::InvalidUtcOffset { value: 24 })
    })?;

    let timeout = ConfigFile {
        measurement: Some(MeasurementConfig {
            timeout: Some(DurationValue::Seconds(0)),
            ..MeasurementConfig::default()
        }),
        ..ConfigFile::default()
    };
    expect_config_error(&timeout, |err| {
        matches!(err, ConfigError::InvalidDuration { field, .. } if *field == "measurement.timeout")
    })
}

#[test]
fn invalid_exchange_definitions_are_rejected() -> Result<(), String> {
    let cases: [(&str, fn(&ConfigError) -> bool); 5] = [
        ("[exchanges]\n", |err| matches!(err, ConfigError::NoExchanges)),
        (
            "[exchanges.okx]\nname = \"OKX\"\n",
            |err| matches!(err, ConfigError::ExchangeWithoutEndpoints { .. }),
        ),
        (
            "[exchanges.\"../okx\".endpoints.ticker]\nurl = \"https://x.test\"\n",
            |err| matches!(err, ConfigError::InvalidExchangeKey { .. }),
        ),
        (
            "[exchanges.okx.endpoints.ticker]\nurl = \"not a url\"\n",
            |err| matches!(err, ConfigError::InvalidEndpointUrl { .. }),
        ),
        (
            "[exchanges.okx.endpoints.ticker]\nurl = \"https://x.test\"\nlatency_threshold_ms = -1.0\n",
            |err| matches!(err, ConfigError::NegativeThreshold { .. }),
        ),
    ];

    for (content, check) in cases {
        let config = write_and_load("latprobe.toml", content)?;
        expect_config_error(&config, check)?;
    }
    Ok(())
}

#[test]
fn mixed_case_exchange_keys_are_normalized() -> Result<(), String> {
    let config = write_and_load(
        "latprobe.toml",
        "[exchanges.Binance.endpoints.ticker]\nurl = \"https://x.test\"\n",
    )?;
    let (cli, matches) = parse_cli(&["latprobe"])?;
    let settings =
        resolve_settings(&cli, &matches, Some(&config)).map_err(|err| err.to_string())?;
    let profile = settings
        .registry
        .exchange("binance")
        .ok_or("Exchange should be stored under its lowercase key")?;
    if profile.label() != "BINANCE" {
        return Err(format!("Unexpected label: {}", profile.label()));
    }
    let endpoint = profile
        .endpoints
        .get("ticker")
        .ok_or("Missing ticker endpoint")?;
    if endpoint.exchange != "binance" {
        return Err(format!("Unexpected endpoint owner: {}", endpoint.exchange));
    }
    Ok(())
}

#[test]
fn exchange_keys_differing_only_in_case_are_rejected() -> Result<(), String> {
    let config = write_and_load(
        "latprobe.toml",
        "[exchanges.okx.endpoints.ticker]\nurl = \"https://x.test\"\n\n[exchanges.OKX.endpoints.ticker]\nurl = \"https://y.test\"\n",
    )?;
    expect_config_error(&config, |err| {
        matches!(err, ConfigError::DuplicateExchangeKey { .. })
    })
}

#[test]
fn unsupported_extension_is_rejected() -> Result<(), String> {
    match write_and_load("latprobe.yaml", "measurement: {}") {
        Err(message) if message.contains("Unsupported config extension") => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other)),
    }
}

#[test]
fn parse_duration_value_accepts_units() -> Result<(), String> {
    let cases = [
        ("10", Duration::from_secs(10)),
        ("10s", Duration::from_secs(10)),
        ("500ms", Duration::from_millis(500)),
        (" 2m ", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
    ];
    for (input, expected) in cases {
        let parsed = parse_duration_value(input).map_err(|err| err.to_string())?;
        if parsed != expected {
            return Err(format!("'{}' parsed as {:?}", input, parsed));
        }
    }
    Ok(())
}

#[test]
fn parse_duration_value_names_the_failure() -> Result<(), String> {
    let cases = [
        ("", DurationError::Empty),
        ("ms", DurationError::MissingNumber),
        ("0ms", DurationError::Zero),
        (
            "5d",
            DurationError::UnknownUnit {
                unit: "d".to_owned(),
            },
        ),
        ("18446744073709551615h", DurationError::Overflow),
        ("99999999999999999999s", DurationError::NumberOutOfRange),
    ];
    for (input, expected) in cases {
        match parse_duration_value(input) {
            Err(err) if err == expected => {}
            other => return Err(format!("'{}' gave {:?}, expected {:?}", input, other, expected)),
        }
    }
    Ok(())
}

#[test]
fn zero_second_integer_is_rejected() -> Result<(), String> {
    let config: ConfigFile =
        toml::from_str("[measurement]\ntimeout = 0\n").map_err(|err| err.to_string())?;
    let timeout = config
        .measurement
        .and_then(|measurement| measurement.timeout)
        .ok_or("Missing timeout")?;
    match timeout.to_duration() {
        Err(DurationError::Zero) => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other)),
    }
}

#[test]
fn default_config_prefers_toml_over_json() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    if find_default_config(dir.path()).is_some() {
        return Err("Empty directory must have no config".to_owned());
    }

    let json = dir.path().join("latprobe.json");
    std::fs::write(&json, "{}").map_err(|err| err.to_string())?;
    if find_default_config(dir.path()) != Some(json) {
        return Err("Expected the JSON config".to_owned());
    }

    let toml = dir.path().join("latprobe.toml");
    std::fs::write(&toml, "").map_err(|err| err.to_string())?;
    if find_default_config(dir.path()) != Some(toml) {
        return Err("Expected the TOML config to win".to_owned());
    }
    Ok(())
}
