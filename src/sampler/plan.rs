use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NUM_REQUESTS: usize = 5;
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// What happens when a request slot fails on every attempt.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlotExhaustion {
    /// Drop the slot and keep sampling.
    #[default]
    Discard,
    /// Stop the measurement and surface the last attempt's error.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingPlan {
    pub num_requests: usize,
    pub max_retries: usize,
    pub on_exhausted: SlotExhaustion,
    /// Overall wall-time cap for one measurement. No new attempt starts once
    /// it has elapsed.
    pub budget: Option<Duration>,
}

impl Default for SamplingPlan {
    fn default() -> Self {
        Self {
            num_requests: DEFAULT_NUM_REQUESTS,
            max_retries: DEFAULT_MAX_RETRIES,
            on_exhausted: SlotExhaustion::Discard,
            budget: None,
        }
    }
}

impl SamplingPlan {
    pub(super) fn budget_exhausted(&self, elapsed: Duration) -> bool {
        self.budget.is_some_and(|budget| elapsed >= budget)
    }
}

/// Result of one successful measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub average_ms: f64,
    pub successful_slots: usize,
    pub failed_slots: usize,
    pub failed_attempts: usize,
    pub attempts: usize,
}
