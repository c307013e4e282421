use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::app::{self, Runner};
use crate::args::{Action, Cli};
use crate::config::{Settings, load_config, resolve_settings};
use crate::error::AppResult;
use crate::http::HttpExecutor;

/// Parses the command line and runs the selected command.
///
/// # Errors
///
/// Returns an error for invalid arguments or config, unknown exchanges and
/// failed reports. Failed measurements are printed and do not fail the run.
pub fn run() -> AppResult<()> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    crate::logger::init_logging(cli.verbose, cli.no_color);

    run_with(&cli, &matches)
}

fn run_with(cli: &Cli, matches: &ArgMatches) -> AppResult<()> {
    let action = cli.action()?;
    let config = load_config(cli.config.as_deref())?;
    let settings = resolve_settings(cli, matches, config.as_ref())?;

    match action {
        Action::List => {
            app::list_exchanges(&settings.registry);
            Ok(())
        }
        Action::Report => app::generate_reports(&settings),
        Action::All => run_measurements(&settings, None),
        Action::Run(exchange) => run_measurements(&settings, Some(&exchange)),
    }
}

fn run_measurements(settings: &Settings, exchange: Option<&str>) -> AppResult<()> {
    let executor = HttpExecutor::from_settings(&settings.client)?;
    let runner = Runner::new(settings, executor);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match exchange {
            Some(exchange) => runner.run_exchange(exchange).await.map(|_| ()),
            None => {
                runner.run_all().await;
                Ok(())
            }
        }
    })
}
