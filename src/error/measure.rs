use thiserror::Error;

use crate::registry::HttpMethod;

/// Why a single timed request did not count as a success.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    #[error("HTTP status {code}")]
    Status { code: u16 },
    #[error("request timed out: {message}")]
    Timeout { message: String },
    #[error("transport error: {message}")]
    Transport { message: String },
    #[error("unsupported HTTP method: {method}")]
    Unsupported { method: HttpMethod },
}

#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("Endpoint '{endpoint}' not found for exchange '{exchange}'.")]
    EndpointNotFound { exchange: String, endpoint: String },
    #[error("Unsupported HTTP method: {method}")]
    UnsupportedMethod { method: HttpMethod },
    #[error("Sampling plan needs at least one request and one attempt per request.")]
    InvalidSamplingPlan,
    #[error("Request {slot} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        slot: usize,
        attempts: usize,
        last_error: AttemptFailure,
    },
    #[error("All {requests} requests failed ({failed_attempts} failed attempts).")]
    AllRequestsFailed {
        requests: usize,
        failed_attempts: usize,
    },
}
