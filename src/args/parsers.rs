use std::time::Duration;

use crate::config::parse_duration_value;
use crate::error::{AppError, AppResult, ValidationError};

pub(crate) fn parse_header(s: &str) -> Result<(String, String), ValidationError> {
    match s.split_once(':') {
        Some((key, value)) => Ok((key.trim().to_owned(), value.trim().to_owned())),
        None => Err(ValidationError::InvalidHeaderFormat {
            value: s.to_owned(),
        }),
    }
}

pub(super) fn parse_positive_usize(s: &str) -> AppResult<usize> {
    match s.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(AppError::validation(
            ValidationError::PositiveNumberRequired {
                value: s.to_owned(),
            },
        )),
    }
}

pub(super) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    parse_duration_value(s).map_err(|source| {
        AppError::validation(ValidationError::InvalidDuration {
            value: s.to_owned(),
            source,
        })
    })
}

pub(crate) fn parse_bool_env(s: &str) -> AppResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(AppError::validation(ValidationError::InvalidBoolean {
            value: s.to_owned(),
        })),
    }
}
