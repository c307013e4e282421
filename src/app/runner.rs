use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::RequestExecutor;
use crate::registry::{ExchangeProfile, Registry};
use crate::sampler::Sampler;
use crate::store::SeriesStore;

use super::summary::{EndpointOutcome, RunSummary};

/// Measures endpoints and records the results.
pub(crate) struct Runner<E> {
    sampler: Sampler<E>,
    store: SeriesStore,
}

impl<E> Runner<E>
where
    E: RequestExecutor,
{
    pub(crate) fn new(settings: &Settings, executor: E) -> Self {
        let registry = Arc::new(settings.registry.clone());
        Self {
            sampler: Sampler::new(registry, executor, settings.plan.clone()),
            store: SeriesStore::new(&settings.data_dir, settings.max_entries),
        }
    }

    fn registry(&self) -> &Registry {
        self.sampler.registry()
    }

    /// Measures every endpoint of every exchange, then prints the summary.
    pub(crate) async fn run_all(&self) -> RunSummary {
        println!("Starting API latency tests for all exchanges...");
        let mut summary = RunSummary::default();
        for profile in self.registry().exchanges() {
            self.measure_exchange(profile, &mut summary).await;
        }
        summary.print();
        summary
    }

    /// Measures every endpoint of one exchange.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCommand` when the exchange is not configured.
    pub(crate) async fn run_exchange(&self, exchange: &str) -> AppResult<RunSummary> {
        let key = exchange.to_ascii_lowercase();
        let Some(profile) = self.registry().exchange(&key) else {
            error!("Unknown command or exchange: {}", exchange);
            return Err(AppError::validation(ValidationError::UnknownCommand {
                value: exchange.to_owned(),
            }));
        };
        let mut summary = RunSummary::default();
        self.measure_exchange(profile, &mut summary).await;
        Ok(summary)
    }

    async fn measure_exchange(&self, profile: &ExchangeProfile, summary: &mut RunSummary) {
        let label = profile.label();
        let plan = self.sampler.plan();
        println!();
        println!("=== Running {} latency tests ===", label);
        debug!(
            "{}: {} requests per endpoint, {} attempts per request, on exhaustion: {:?}",
            label, plan.num_requests, plan.max_retries, plan.on_exhausted
        );

        for (endpoint_key, descriptor) in &profile.endpoints {
            let result = match self
                .sampler
                .measure_detailed(&profile.key, endpoint_key)
                .await
            {
                Ok(measurement) => {
                    info!(
                        "{} {}: {} of {} requests succeeded in {} attempts",
                        label,
                        endpoint_key,
                        measurement.successful_slots,
                        measurement
                            .successful_slots
                            .saturating_add(measurement.failed_slots),
                        measurement.attempts
                    );
                    match self
                        .store
                        .append_tagged(&profile.key, endpoint_key, measurement.average_ms)
                    {
                        Ok(_) => Ok(measurement.average_ms),
                        Err(err) => Err(format!("failed to save measurement: {}", err)),
                    }
                }
                Err(err) => Err(err.to_string()),
            };

            match &result {
                Ok(latency_ms) => {
                    println!("✓ {} {}: {:.2} ms", label, endpoint_key, latency_ms);
                    if let Some(threshold) = descriptor.latency_threshold_ms
                        && *latency_ms > threshold
                    {
                        warn!(
                            "{} {} exceeded its latency threshold ({:.2} ms > {:.2} ms)",
                            label, endpoint_key, latency_ms, threshold
                        );
                        println!(
                            "⚠ {} {}: {:.2} ms exceeds the {:.2} ms threshold",
                            label, endpoint_key, latency_ms, threshold
                        );
                    }
                }
                Err(message) => println!("✗ {} {}: {}", label, endpoint_key, message),
            }

            summary.push(EndpointOutcome {
                exchange: label.clone(),
                endpoint: endpoint_key.clone(),
                result,
            });
        }
    }
}
