//! Sysfs GPIO inputs and the privileged-executor output path.

pub mod output;
pub mod pin;
pub mod properties;

pub use output::OutputWriter;
pub use pin::SysfsPin;
pub use properties::{PropertyStore, SystemProperties};

use std::fmt;

/// Errors from the sysfs/executor GPIO paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// Filesystem or property access failed.
    Io { operation: String, details: String },
    /// A sysfs value or result file held something unparseable.
    BadValue { raw: String },
    /// The privileged executor ran the output script and it exited non-zero.
    ScriptFailure { code: i32 },
    /// The executor never confirmed completion within the poll budget.
    ExecutorTimeout { iterations: u32 },
}

impl GpioError {
    pub(crate) fn io(operation: impl Into<String>, err: &std::io::Error) -> Self {
        GpioError::Io {
            operation: operation.into(),
            details: err.to_string(),
        }
    }
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpioError::Io { operation, details } => {
                write!(f, "I/O error during {}: {}", operation, details)
            }
            GpioError::BadValue { raw } => write!(f, "unparseable GPIO value {:?}", raw),
            GpioError::ScriptFailure { code } => {
                write!(f, "output script exited with code {}", code)
            }
            GpioError::ExecutorTimeout { iterations } => {
                write!(
                    f,
                    "executor did not confirm output within {} poll iterations",
                    iterations
                )
            }
        }
    }
}

impl std::error::Error for GpioError {}

/// Result type for GPIO operations.
pub type GpioResult<T> = Result<T, GpioError>;
