//! Error types for the breakout screener.

use thiserror::Error;

/// Result type alias using the screener error type.
pub type Result<T> = std::result::Result<T, ScreenError>;

/// Errors raised for malformed or insufficient input.
///
/// Business conditions (zero volumes, zero trade counts) never produce an
/// error; they resolve to a `0` ratio or a failed gate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScreenError {
    /// History ran out before the window collected enough trading days.
    #[error("Insufficient history: needed {window} trading days, found {found}")]
    InsufficientHistory { window: usize, found: usize },

    /// A numeric input was NaN, infinite, or negative where that is not allowed.
    #[error("Invalid input: {field} = {value}")]
    InvalidInput { field: String, value: f64 },

    /// Screener thresholds failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ScreenError {
    pub(crate) fn invalid(field: impl Into<String>, value: f64) -> Self {
        Self::InvalidInput {
            field: field.into(),
            value,
        }
    }

    /// Check if this error is caused by too short a history.
    pub const fn is_insufficient_history(&self) -> bool {
        matches!(self, Self::InsufficientHistory { .. })
    }
}
