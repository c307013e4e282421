use std::time::Duration;

use reqwest::{Client, redirect};

use crate::error::AppResult;

pub const DEFAULT_USER_AGENT: &str = concat!(
    "latprobe/",
    env!("CARGO_PKG_VERSION"),
    " (market-data latency monitor)"
);

/// Redirects are followed like a browser would, but never endlessly.
const REDIRECT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub user_agent: String,
    pub connect_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Builds the shared HTTP client. Per-request timeouts come from each
/// endpoint descriptor.
///
/// # Errors
///
/// Returns an error when the TLS backend or client cannot be initialised.
pub fn build_client(settings: &ClientSettings) -> AppResult<Client> {
    let client = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .connect_timeout(settings.connect_timeout)
        .redirect(redirect::Policy::limited(REDIRECT_LIMIT))
        .build()?;
    Ok(client)
}
