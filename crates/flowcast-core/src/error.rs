//! Core error types for flowcast-core.
//!
//! Validation failures are reported at the entry point of the offending
//! operation, before any computation starts. Statistical "undefined"
//! conditions (a correlation with too few pairs, an average with no
//! original samples) are absent values in the output structures, not
//! errors, so the rest of an aggregate run still completes.

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for flowcast-core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Not enough historical data to produce a meaningful result
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A caller-supplied parameter rejected before computation
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// Malformed date range
    #[error("Invalid date range: latest ({latest}) is before earliest ({earliest})")]
    InvalidDateRange {
        earliest: NaiveDate,
        latest: NaiveDate,
    },
}

impl CoreError {
    pub(crate) fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        CoreError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
