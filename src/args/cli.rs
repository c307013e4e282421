use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::charts::DEFAULT_REPORTS_DIR;
use crate::error::ValidationError;
use crate::sampler::{DEFAULT_MAX_RETRIES, DEFAULT_NUM_REQUESTS, SlotExhaustion};
use crate::store::DEFAULT_MAX_ENTRIES;

use super::defaults::{DEFAULT_DATA_DIR, DEFAULT_TIMEOUT};
use super::parsers::{parse_bool_env, parse_duration_arg, parse_positive_usize};

#[derive(Debug, Subcommand, Clone, PartialEq, Eq)]
pub enum Command {
    /// Measure every endpoint of every configured exchange (default)
    All,
    /// Measure every endpoint of one exchange
    Run {
        /// Exchange key, e.g. okx
        exchange: String,
    },
    /// List configured exchanges and their endpoints
    #[command(alias = "ls")]
    List,
    /// Render charts and the summary report from stored data
    Report,
    /// `latprobe <exchange>` shorthand for `latprobe run <exchange>`
    #[command(external_subcommand)]
    External(Vec<String>),
}

/// What a parsed command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    All,
    Run(String),
    List,
    Report,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "latprobe",
    version,
    about = "Market-data API latency monitor for cryptocurrency exchanges - timed retries, bounded JSON history, charts and an HTML summary."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to config file (TOML/JSON). Defaults to ./latprobe.toml or ./latprobe.json if present.
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    /// Directory holding the per-exchange latency series
    #[arg(long = "data-dir", global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Directory receiving charts and the summary report
    #[arg(long = "reports-dir", global = true, default_value = DEFAULT_REPORTS_DIR)]
    pub reports_dir: PathBuf,

    /// Timed requests averaged into one measurement
    #[arg(
        long,
        short = 'n',
        global = true,
        default_value_t = DEFAULT_NUM_REQUESTS,
        value_parser = parse_positive_usize
    )]
    pub requests: usize,

    /// Attempts per request before it counts as failed
    #[arg(
        long,
        short = 'r',
        global = true,
        default_value_t = DEFAULT_MAX_RETRIES,
        value_parser = parse_positive_usize
    )]
    pub retries: usize,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(
        long,
        short = 't',
        global = true,
        default_value = DEFAULT_TIMEOUT,
        value_parser = parse_duration_arg
    )]
    pub timeout: Duration,

    /// Samples kept per exchange; older ones are evicted first
    #[arg(
        long = "max-entries",
        global = true,
        default_value_t = DEFAULT_MAX_ENTRIES,
        value_parser = parse_positive_usize
    )]
    pub max_entries: usize,

    /// What to do when a request fails on every attempt
    #[arg(long = "on-exhausted", global = true, value_enum, default_value_t = SlotExhaustion::Discard)]
    pub on_exhausted: SlotExhaustion,

    /// Enable verbose logging (sets log level to debug unless overridden by LATPROBE_LOG/RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", global = true, env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}

impl Cli {
    /// Resolves the subcommand, treating an unknown one as an exchange key.
    ///
    /// # Errors
    ///
    /// Returns an error when a bare exchange name is followed by more
    /// arguments.
    pub fn action(&self) -> Result<Action, ValidationError> {
        match &self.command {
            None | Some(Command::All) => Ok(Action::All),
            Some(Command::Run { exchange }) => Ok(Action::Run(exchange.clone())),
            Some(Command::List) => Ok(Action::List),
            Some(Command::Report) => Ok(Action::Report),
            Some(Command::External(raw)) => match raw.as_slice() {
                [exchange] => Ok(Action::Run(exchange.clone())),
                [command, rest @ ..] => Err(ValidationError::UnexpectedArguments {
                    command: command.clone(),
                    rest: rest.join(" "),
                }),
                [] => Ok(Action::All),
            },
        }
    }
}
