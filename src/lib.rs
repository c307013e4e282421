//! Core library for the `latprobe` CLI.
//!
//! Measures HTTP latency of exchange market-data endpoints with a
//! retry-averaging sampler, keeps a bounded JSON history per exchange and
//! derives statistics, PNG charts and an HTML summary from it. The primary
//! user-facing interface is the `latprobe` command-line application.
mod app;
pub mod args;
pub mod charts;
pub mod config;
mod entry;
pub mod error;
pub mod http;
mod logger;
pub mod registry;
pub mod report;
pub mod sampler;
pub mod stats;
pub mod store;

pub use entry::run;
