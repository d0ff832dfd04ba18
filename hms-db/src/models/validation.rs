//! Validation error types and column checks

use std::fmt;

/// Validation error for insert/update payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required column is empty
    Empty { field: &'static str },

    /// Value exceeds the column's VARCHAR length
    TooLong { field: &'static str, max: usize },

    /// Numeric value outside the allowed range
    OutOfRange { field: &'static str, reason: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::OutOfRange { field, reason } => write!(f, "{}: {}", field, reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a NOT NULL VARCHAR(max) column.
pub fn required(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    bounded(field, Some(value), max)
}

/// Check a nullable VARCHAR(max) column.
///
/// Length is counted in characters, matching Postgres VARCHAR semantics.
pub fn bounded(field: &'static str, value: Option<&str>, max: usize) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong { field, max }),
        _ => Ok(()),
    }
}

/// Check that an optional amount is not negative.
pub fn non_negative(field: &'static str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.is_nan() || v < 0.0 => Err(ValidationError::OutOfRange {
            field,
            reason: "must be a non-negative number",
        }),
        _ => Ok(()),
    }
}
