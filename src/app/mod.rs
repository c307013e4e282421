//! Command implementations on top of the sampler, store and report layers.
mod listing;
mod reports;
mod runner;
pub(crate) mod summary;


pub(crate) use listing::list_exchanges;
pub(crate) use reports::generate_reports;
pub(crate) use runner::Runner;
