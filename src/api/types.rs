//! Facade configuration and error types.

use crate::gpio::output::{
    DEFAULT_INITIAL_DELAY_MS, DEFAULT_POLL_BUDGET, DEFAULT_POLL_INTERVAL_MS, DEFAULT_SCRIPT_DIR,
    DEFAULT_TRIGGER_PROPERTY,
};
use crate::gpio::pin::DEFAULT_SYSFS_ROOT;
use crate::gpio::GpioError;
use crate::hardware::McuError;
use crate::info::DEFAULT_DOCK_STATE_PATH;
use crate::validation::ArgumentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// HAL configuration.
///
/// Defaults match the shipped OBC5 OS build; tests and ports override the
/// paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HalConfig {
    /// MCU control tool binary.
    pub tool: String,
    /// Kernel GPIO class directory.
    pub sysfs_root: PathBuf,
    /// Directory for output scripts and the executor result file.
    pub script_dir: PathBuf,
    /// Property watched by the privileged executor.
    pub trigger_property: String,
    /// Dock switch state file.
    pub dock_state_path: PathBuf,
    /// Output validation poll iterations.
    pub output_poll_budget: u32,
    /// Sleep between poll iterations, milliseconds.
    pub output_poll_interval_ms: u64,
    /// Settle delay before the first poll, milliseconds.
    pub output_initial_delay_ms: u64,
}

impl Default for HalConfig {
    fn default() -> Self {
        Self {
            tool: "mctl".to_string(),
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
            script_dir: PathBuf::from(DEFAULT_SCRIPT_DIR),
            trigger_property: DEFAULT_TRIGGER_PROPERTY.to_string(),
            dock_state_path: PathBuf::from(DEFAULT_DOCK_STATE_PATH),
            output_poll_budget: DEFAULT_POLL_BUDGET,
            output_poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            output_initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
        }
    }
}

impl HalConfig {
    /// Load from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> HalResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| HalError::Config {
            details: format!("cannot read {}: {}", path.display(), e),
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| HalError::Config {
            details: format!("cannot parse {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write to a JSON file.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> HalResult<()> {
        let raw = serde_json::to_string_pretty(self).map_err(|e| HalError::Config {
            details: e.to_string(),
        })?;
        std::fs::write(path.as_ref(), raw).map_err(|e| HalError::Config {
            details: format!("cannot write {}: {}", path.as_ref().display(), e),
        })
    }

    pub fn validate(&self) -> HalResult<()> {
        if self.output_poll_budget == 0 {
            return Err(HalError::Config {
                details: "output_poll_budget must be at least 1".to_string(),
            });
        }
        if self.trigger_property.is_empty() {
            return Err(HalError::Config {
                details: "trigger_property must not be empty".to_string(),
            });
        }
        if self.tool.is_empty() {
            return Err(HalError::Config {
                details: "tool must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Unified facade error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HalError {
    /// A parameter was rejected before any hardware access.
    Argument(ArgumentError),
    /// The MCU transport failed.
    Mcu(McuError),
    /// A sysfs or output-executor operation failed.
    Gpio(GpioError),
    /// Property store access failed.
    Property { name: String, details: String },
    /// The configuration is unusable.
    Config { details: String },
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalError::Argument(e) => write!(f, "{}", e),
            HalError::Mcu(e) => write!(f, "{}", e),
            HalError::Gpio(e) => write!(f, "{}", e),
            HalError::Property { name, details } => {
                write!(f, "property {} access failed: {}", name, details)
            }
            HalError::Config { details } => write!(f, "configuration error: {}", details),
        }
    }
}

impl std::error::Error for HalError {}

impl From<ArgumentError> for HalError {
    fn from(e: ArgumentError) -> Self {
        HalError::Argument(e)
    }
}

impl From<McuError> for HalError {
    fn from(e: McuError) -> Self {
        HalError::Mcu(e)
    }
}

impl From<GpioError> for HalError {
    fn from(e: GpioError) -> Self {
        HalError::Gpio(e)
    }
}

/// Result type for facade operations.
pub type HalResult<T> = Result<T, HalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(HalConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_poll_budget_rejected() {
        let config = HalConfig {
            output_poll_budget: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(HalError::Config { .. })
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let dir = std::env::temp_dir().join(format!("obc-hal-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("hal.json");

        let mut config = HalConfig::default();
        config.output_poll_budget = 20;
        config.output_poll_interval_ms = 25;
        config.to_json_file(&path).unwrap();

        let loaded = HalConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded.output_poll_budget, 20);
        assert_eq!(loaded.output_poll_interval_ms, 25);
        assert_eq!(loaded.tool, "mctl");
    }

    #[test]
    fn test_error_conversions() {
        let err: HalError = McuError::ConnectionFailure.into();
        assert!(matches!(err, HalError::Mcu(McuError::ConnectionFailure)));

        let err: HalError = ArgumentError::new("led", 5, "0, 1 or 2").into();
        assert!(matches!(err, HalError::Argument(_)));
    }
}
