//! Argument validation error type.

use std::fmt;

/// A parameter was rejected before any hardware access was attempted.
///
/// Distinct from [`crate::hardware::McuError`]: an `ArgumentError` means the
/// request never reached the MCU layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentError {
    /// Name of the offending parameter.
    pub parameter: String,
    /// The value that was passed.
    pub value: String,
    /// What would have been accepted.
    pub expected: String,
}

impl ArgumentError {
    pub fn new(
        parameter: impl Into<String>,
        value: impl fmt::Display,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            parameter: parameter.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {}: got {}, expected {}",
            self.parameter, self.value, self.expected
        )
    }
}

impl std::error::Error for ArgumentError {}

/// Result type for validation checks.
pub type ValidationResult = Result<(), ArgumentError>;
