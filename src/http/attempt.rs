use crate::error::AttemptFailure;

/// Outcome of exactly one timed request. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleAttempt {
    Succeeded { latency_ms: f64 },
    Failed(AttemptFailure),
}

impl SampleAttempt {
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self, SampleAttempt::Succeeded { .. })
    }

    #[must_use]
    pub const fn latency_ms(&self) -> Option<f64> {
        match self {
            SampleAttempt::Succeeded { latency_ms } => Some(*latency_ms),
            SampleAttempt::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            SampleAttempt::Succeeded { .. } => None,
            SampleAttempt::Failed(failure) => Some(failure.to_string()),
        }
    }
}
