//! Timed HTTP request execution.
mod attempt;
mod client;
mod execution;

#[cfg(test)]
pub(crate) mod test_server;

pub use attempt::SampleAttempt;
pub use client::{ClientSettings, DEFAULT_USER_AGENT, build_client};
pub use execution::{HttpExecutor, RequestExecutor};
