//! Retry-averaging latency sampler.
//!
//! One measurement runs `num_requests` sequential request slots against a
//! single endpoint. Each slot is retried up to `max_retries` times and stops
//! at its first success; the measurement is the mean of the successful slots.
mod plan;


use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::{AttemptFailure, MeasureError};
use crate::http::{RequestExecutor, SampleAttempt};
use crate::registry::Registry;

pub use plan::{
    DEFAULT_MAX_RETRIES, DEFAULT_NUM_REQUESTS, Measurement, SamplingPlan, SlotExhaustion,
};

pub struct Sampler<E> {
    registry: Arc<Registry>,
    executor: E,
    plan: SamplingPlan,
}

impl<E> Sampler<E>
where
    E: RequestExecutor,
{
    pub fn new(registry: Arc<Registry>, executor: E, plan: SamplingPlan) -> Self {
        Self {
            registry,
            executor,
            plan,
        }
    }

    #[must_use]
    pub const fn plan(&self) -> &SamplingPlan {
        &self.plan
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Measures the average latency of one endpoint.
    ///
    /// # Errors
    ///
    /// Returns `EndpointNotFound`, `UnsupportedMethod`, `InvalidSamplingPlan`,
    /// `RetriesExhausted` (abort policy only) or `AllRequestsFailed`.
    pub async fn measure(
        &self,
        exchange: &str,
        endpoint_key: &str,
        num_requests: usize,
        max_retries: usize,
    ) -> Result<f64, MeasureError> {
        let plan = SamplingPlan {
            num_requests,
            max_retries,
            ..self.plan.clone()
        };
        self.measure_with(exchange, endpoint_key, &plan)
            .await
            .map(|measurement| measurement.average_ms)
    }

    /// Measures one endpoint with the sampler's configured plan.
    ///
    /// # Errors
    ///
    /// See [`Sampler::measure`].
    pub async fn measure_detailed(
        &self,
        exchange: &str,
        endpoint_key: &str,
    ) -> Result<Measurement, MeasureError> {
        self.measure_with(exchange, endpoint_key, &self.plan).await
    }

    /// Measures one endpoint and reports slot/attempt counters.
    ///
    /// # Errors
    ///
    /// See [`Sampler::measure`].
    pub async fn measure_with(
        &self,
        exchange: &str,
        endpoint_key: &str,
        plan: &SamplingPlan,
    ) -> Result<Measurement, MeasureError> {
        let descriptor = self.registry.endpoint(exchange, endpoint_key)?;
        if !descriptor.method.is_executable() {
            return Err(MeasureError::UnsupportedMethod {
                method: descriptor.method,
            });
        }
        if plan.num_requests == 0 || plan.max_retries == 0 {
            return Err(MeasureError::InvalidSamplingPlan);
        }

        let started = Instant::now();
        let mut latencies: Vec<f64> = Vec::with_capacity(plan.num_requests);
        let mut failed_slots = 0usize;
        let mut failed_attempts = 0usize;
        let mut attempts = 0usize;

        for slot in 1..=plan.num_requests {
            if plan.budget_exhausted(started.elapsed()) {
                let remaining = plan.num_requests.saturating_sub(slot).saturating_add(1);
                warn!(
                    "{} {}: time budget exhausted, skipping {} remaining request(s)",
                    exchange, endpoint_key, remaining
                );
                failed_slots = failed_slots.saturating_add(remaining);
                break;
            }

            let mut slot_attempts = 0usize;
            let mut last_error: Option<AttemptFailure> = None;
            let mut latency: Option<f64> = None;

            while slot_attempts < plan.max_retries {
                if slot_attempts > 0 && plan.budget_exhausted(started.elapsed()) {
                    break;
                }
                slot_attempts = slot_attempts.saturating_add(1);
                attempts = attempts.saturating_add(1);
                match self.executor.execute(descriptor).await {
                    SampleAttempt::Succeeded { latency_ms } => {
                        latency = Some(latency_ms);
                        break;
                    }
                    SampleAttempt::Failed(failure) => {
                        failed_attempts = failed_attempts.saturating_add(1);
                        debug!(
                            "{} {} request {} attempt {}/{} failed: {}",
                            exchange, endpoint_key, slot, slot_attempts, plan.max_retries, failure
                        );
                        last_error = Some(failure);
                    }
                }
            }

            if let Some(latency_ms) = latency {
                latencies.push(latency_ms);
                continue;
            }

            failed_slots = failed_slots.saturating_add(1);
            if let Some(last_error) = last_error {
                warn!(
                    "{} {} request {} failed after {} attempts: {}",
                    exchange, endpoint_key, slot, slot_attempts, last_error
                );
                if plan.on_exhausted == SlotExhaustion::Abort {
                    return Err(MeasureError::RetriesExhausted {
                        slot,
                        attempts: slot_attempts,
                        last_error,
                    });
                }
            }
        }

        let Some(average_ms) = mean(&latencies) else {
            return Err(MeasureError::AllRequestsFailed {
                requests: plan.num_requests,
                failed_attempts,
            });
        };

        Ok(Measurement {
            average_ms,
            successful_slots: latencies.len(),
            failed_slots,
            failed_attempts,
            attempts,
        })
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    Some(sum / values.len() as f64)
}
