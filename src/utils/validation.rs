//! Field validation and numeric coercion helpers.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::utils::errors::AppError;

/// Require a non-empty string field, naming the field in the error.
pub fn require_field<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{} is required", field))),
    }
}

/// Coerce a JSON amount value into an optional decimal.
///
/// Forms sent either a number or the raw input string, so both are accepted.
/// Empty string and null mean "not set". Anything non-numeric is rejected
/// rather than silently zeroed.
pub fn coerce_amount(field: &str, value: Option<&Value>) -> Result<Option<Decimal>, AppError> {
    let invalid = || AppError::Validation(format!("{} must be a number", field));

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .map(Some)
            .map_err(|_| invalid()),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Decimal::from_str(trimmed).map(Some).map_err(|_| invalid())
            }
        }
        Some(_) => Err(invalid()),
    }
}
