use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use tokio::time::Instant;
use tracing::debug;

use crate::error::{AppResult, AttemptFailure};
use crate::registry::{EndpointDescriptor, HttpMethod};

use super::attempt::SampleAttempt;
use super::client::{ClientSettings, build_client};

/// The only status code counted as a successful sample.
const SUCCESS_STATUS: u16 = 200;

/// Issues a single timed request for an endpoint.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, descriptor: &EndpointDescriptor) -> SampleAttempt;
}

#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds an executor with its own client.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_settings(settings: &ClientSettings) -> AppResult<Self> {
        Ok(Self::new(build_client(settings)?))
    }

    fn request_builder(
        &self,
        descriptor: &EndpointDescriptor,
    ) -> Result<RequestBuilder, AttemptFailure> {
        let mut builder = match descriptor.method {
            HttpMethod::Get => self.client.get(&descriptor.url),
            HttpMethod::Post => {
                let builder = self.client.post(&descriptor.url);
                match descriptor.body.as_ref() {
                    Some(body) => builder
                        .header(CONTENT_TYPE, "application/json")
                        .body(body.clone()),
                    None => builder,
                }
            }
            HttpMethod::Put | HttpMethod::Patch | HttpMethod::Delete => {
                return Err(AttemptFailure::Unsupported {
                    method: descriptor.method,
                });
            }
        };
        builder = builder.timeout(descriptor.timeout);
        for (key, value) in &descriptor.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        Ok(builder)
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, descriptor: &EndpointDescriptor) -> SampleAttempt {
        let request = match self
            .request_builder(descriptor)
            .and_then(|builder| builder.build().map_err(|err| classify(&err)))
        {
            Ok(request) => request,
            Err(failure) => return SampleAttempt::Failed(failure),
        };

        let started = Instant::now();
        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                debug!(
                    "{} {} request failed: {}",
                    descriptor.exchange, descriptor.endpoint_key, err
                );
                return SampleAttempt::Failed(classify(&err));
            }
        };
        let status = response.status().as_u16();
        if let Err(err) = drain_response_body(response).await {
            debug!(
                "{} {} body read failed: {}",
                descriptor.exchange, descriptor.endpoint_key, err
            );
            return SampleAttempt::Failed(classify(&err));
        }
        let elapsed = started.elapsed();

        if status == SUCCESS_STATUS {
            SampleAttempt::Succeeded {
                latency_ms: elapsed.as_secs_f64() * 1000.0,
            }
        } else {
            SampleAttempt::Failed(AttemptFailure::Status { code: status })
        }
    }
}

fn classify(err: &reqwest::Error) -> AttemptFailure {
    if err.is_timeout() {
        AttemptFailure::Timeout {
            message: err.to_string(),
        }
    } else {
        AttemptFailure::Transport {
            message: err.to_string(),
        }
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
