mod app;
mod config;
mod duration;
mod measure;
mod report;
mod store;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use duration::DurationError;
pub use measure::{AttemptFailure, MeasureError};
pub use report::ReportError;
pub use store::StoreError;
pub use validation::ValidationError;
