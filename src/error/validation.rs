use thiserror::Error;

use super::DurationError;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Invalid boolean '{value}'. Expected true/false, yes/no, on/off, or 1/0.")]
    InvalidBoolean { value: String },
    #[error("Unknown command or exchange: '{value}'.")]
    UnknownCommand { value: String },
    #[error("Unexpected arguments after '{command}': {rest}")]
    UnexpectedArguments { command: String, rest: String },
    #[error("Invalid value '{value}'. Expected an integer >= 1.")]
    PositiveNumberRequired { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDuration {
        value: String,
        #[source]
        source: DurationError,
    },
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
