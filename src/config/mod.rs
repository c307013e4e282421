//! Configuration loading and layering onto CLI arguments.
pub(crate) mod apply;
mod loader;
mod parse;
pub mod types;

#[cfg(test)]
mod tests;

pub use apply::{Settings, resolve_settings};
pub use loader::load_config;

#[cfg(test)]
pub(crate) use loader::{find_default_config, load_config_file};
pub(crate) use parse::parse_duration_value;
