use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::MeasureError;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Only GET and POST are executed by the latency probe.
    #[must_use]
    pub const fn is_executable(self) -> bool {
        match self {
            HttpMethod::Get | HttpMethod::Post => true,
            HttpMethod::Put | HttpMethod::Patch | HttpMethod::Delete => false,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exchange keys double as file-name stems, so they are restricted to
/// ASCII letters, digits, `-` and `_`.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

/// One HTTP resource of one exchange, fully resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDescriptor {
    pub exchange: String,
    pub endpoint_key: String,
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    pub timeout: Duration,
    pub latency_threshold_ms: Option<f64>,
}

impl EndpointDescriptor {
    #[must_use]
    pub fn get(exchange: &str, endpoint_key: &str, url: &str, timeout: Duration) -> Self {
        Self {
            exchange: exchange.to_owned(),
            endpoint_key: endpoint_key.to_owned(),
            url: url.to_owned(),
            method: HttpMethod::Get,
            headers: BTreeMap::new(),
            body: None,
            timeout,
            latency_threshold_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeProfile {
    pub key: String,
    pub name: String,
    pub description: String,
    pub endpoints: BTreeMap<String, EndpointDescriptor>,
}

impl ExchangeProfile {
    #[must_use]
    pub fn new(key: &str, name: &str, description: &str) -> Self {
        Self {
            key: key.to_owned(),
            name: name.to_owned(),
            description: description.to_owned(),
            endpoints: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, descriptor: EndpointDescriptor) -> Self {
        self.endpoints
            .insert(descriptor.endpoint_key.clone(), descriptor);
        self
    }

    /// Upper-case label used in console output and chart titles.
    #[must_use]
    pub fn label(&self) -> String {
        self.key.to_ascii_uppercase()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    exchanges: BTreeMap<String, ExchangeProfile>,
}

impl Registry {
    pub fn new<I>(profiles: I) -> Self
    where
        I: IntoIterator<Item = ExchangeProfile>,
    {
        let exchanges = profiles
            .into_iter()
            .map(|profile| (profile.key.clone(), profile))
            .collect();
        Self { exchanges }
    }

    #[must_use]
    pub fn exchange(&self, key: &str) -> Option<&ExchangeProfile> {
        self.exchanges.get(key)
    }

    pub fn exchanges(&self) -> impl Iterator<Item = &ExchangeProfile> {
        self.exchanges.values()
    }

    pub fn exchange_keys(&self) -> impl Iterator<Item = &str> {
        self.exchanges.keys().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.exchanges.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Resolves an endpoint descriptor.
    ///
    /// # Errors
    ///
    /// Returns `EndpointNotFound` when either the exchange or the endpoint key
    /// is not registered.
    pub fn endpoint(
        &self,
        exchange: &str,
        endpoint_key: &str,
    ) -> Result<&EndpointDescriptor, MeasureError> {
        self.exchanges
            .get(exchange)
            .and_then(|profile| profile.endpoints.get(endpoint_key))
            .ok_or_else(|| MeasureError::EndpointNotFound {
                exchange: exchange.to_owned(),
                endpoint: endpoint_key.to_owned(),
            })
    }
}
