//! MCU communication error types.

use std::fmt;

/// Error codes reported by the MCU transport.
///
/// The numeric codes match the device's native result codes:
/// -1 connection failure, -2 transmit failure, -3 receive failure,
/// -4 invalid response type; any other negative code is a general command
/// failure and is carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum McuError {
    /// Could not reach the MCU control channel.
    ConnectionFailure,
    /// Request could not be sent.
    TransmitFailure,
    /// No response, or the response could not be read.
    ReceiveFailure,
    /// A response arrived but was not of the expected shape.
    InvalidResponse { details: String },
    /// The MCU rejected the command with a device-specific code.
    CommandFailure { code: i32 },
}

impl McuError {
    /// Numeric code for this error, matching the device taxonomy.
    pub fn code(&self) -> i32 {
        match self {
            McuError::ConnectionFailure => -1,
            McuError::TransmitFailure => -2,
            McuError::ReceiveFailure => -3,
            McuError::InvalidResponse { .. } => -4,
            McuError::CommandFailure { code } => *code,
        }
    }

    /// Map a negative result code from the transport into an error.
    pub fn from_code(code: i32) -> Self {
        match code {
            -1 => McuError::ConnectionFailure,
            -2 => McuError::TransmitFailure,
            -3 => McuError::ReceiveFailure,
            -4 => McuError::InvalidResponse {
                details: "invalid response message type".to_string(),
            },
            other => McuError::CommandFailure { code: other },
        }
    }

    /// Whether retrying the same request may succeed. Transmit and receive
    /// failures are transient; the rest need operator attention.
    pub fn is_transient(&self) -> bool {
        matches!(self, McuError::TransmitFailure | McuError::ReceiveFailure)
    }
}

impl fmt::Display for McuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            McuError::ConnectionFailure => write!(f, "MCU connection failure"),
            McuError::TransmitFailure => write!(f, "failed to transmit request to MCU"),
            McuError::ReceiveFailure => write!(f, "failed to receive response from MCU"),
            McuError::InvalidResponse { details } => {
                write!(f, "invalid MCU response: {}", details)
            }
            McuError::CommandFailure { code } => {
                write!(f, "MCU command failed with code {}", code)
            }
        }
    }
}

impl std::error::Error for McuError {}

/// Result type for MCU operations.
pub type McuResult<T> = Result<T, McuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for code in [-1, -2, -3, -4, -9] {
            assert_eq!(McuError::from_code(code).code(), code);
        }
    }

    #[test]
    fn test_transient_classification() {
        assert!(McuError::TransmitFailure.is_transient());
        assert!(McuError::ReceiveFailure.is_transient());
        assert!(!McuError::ConnectionFailure.is_transient());
        assert!(!McuError::CommandFailure { code: -7 }.is_transient());
    }
}
