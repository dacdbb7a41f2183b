use std::time::Duration;

use crate::error::{AppError, AppResult, ValidationError};

/// Parses a duration given as a number with an optional `ms`/`s`/`m`/`h`
/// suffix. A bare number means seconds.
///
/// # Errors
///
/// Returns a validation error for empty input, an unknown unit, a zero
/// duration, or a value that overflows.
pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    let value = s.trim();
    if value.is_empty() {
        return Err(AppError::validation(ValidationError::DurationEmpty));
    }

    let digits_end = value
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(digits_end);
    if digits.is_empty() {
        return Err(AppError::validation(
            ValidationError::InvalidDurationFormat {
                value: value.to_owned(),
            },
        ));
    }

    let number: u64 = digits.parse().map_err(|err| {
        AppError::validation(ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })
    })?;

    let millis = match unit {
        "ms" => Some(number),
        "" | "s" => number.checked_mul(1_000),
        "m" => number.checked_mul(60_000),
        "h" => number.checked_mul(3_600_000),
        _ => {
            return Err(AppError::validation(ValidationError::InvalidDurationUnit {
                unit: unit.to_owned(),
            }));
        }
    }
    .ok_or_else(|| AppError::validation(ValidationError::DurationOverflow))?;

    if millis == 0 {
        return Err(AppError::validation(ValidationError::DurationZero));
    }

    Ok(Duration::from_millis(millis))
}
