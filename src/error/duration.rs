use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("duration is empty")]
    Empty,
    #[error("expected an integer followed by ms, s, m or h")]
    MissingNumber,
    #[error("number is out of range")]
    NumberOutOfRange,
    #[error("unknown unit '{unit}'")]
    UnknownUnit { unit: String },
    #[error("duration overflows")]
    Overflow,
    #[error("duration must be > 0")]
    Zero,
}
