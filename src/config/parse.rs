use std::time::Duration;

use crate::error::DurationError;

/// Parses `<integer>[ms|s|m|h]`; a bare integer counts seconds.
pub(crate) fn parse_duration_value(value: &str) -> Result<Duration, DurationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DurationError::Empty);
    }

    let split = value
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    if number.is_empty() {
        return Err(DurationError::MissingNumber);
    }
    let number: u64 = number
        .parse()
        .map_err(|_| DurationError::NumberOutOfRange)?;

    let duration = match unit {
        "ms" => Duration::from_millis(number),
        "" | "s" => Duration::from_secs(number),
        "m" => Duration::from_secs(number.checked_mul(60).ok_or(DurationError::Overflow)?),
        "h" => Duration::from_secs(
            number
                .checked_mul(3600)
                .ok_or(DurationError::Overflow)?,
        ),
        other => {
            return Err(DurationError::UnknownUnit {
                unit: other.to_owned(),
            });
        }
    };
    non_zero(duration)
}

pub(crate) fn seconds_value(secs: u64) -> Result<Duration, DurationError> {
    non_zero(Duration::from_secs(secs))
}

fn non_zero(duration: Duration) -> Result<Duration, DurationError> {
    if duration.is_zero() {
        Err(DurationError::Zero)
    } else {
        Ok(duration)
    }
}
