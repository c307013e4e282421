//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;


pub use cli::{Action, Cli, Command};
pub use defaults::{DEFAULT_CONFIG_FILES, DEFAULT_DATA_DIR, DEFAULT_TIMEOUT};
pub(crate) use parsers::parse_header;
