//! Device identity: serial number and dock/cradle detection.

use crate::core::constants::API_VERSION;
use crate::core::types::DeviceType;
use crate::gpio::properties::PropertyStore;
use crate::gpio::{GpioError, GpioResult};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Sysfs switch reporting which cradle or hub the device is seated in.
pub const DEFAULT_DOCK_STATE_PATH: &str = "/sys/class/switch/dock/state";

/// Property holding the device serial number.
pub const SERIAL_PROPERTY: &str = "ro.serialno";

/// Read-only device identity queries.
pub struct DeviceInfo {
    properties: Arc<dyn PropertyStore>,
    dock_state_path: PathBuf,
}

impl DeviceInfo {
    pub fn new(properties: Arc<dyn PropertyStore>) -> Self {
        Self {
            properties,
            dock_state_path: PathBuf::from(DEFAULT_DOCK_STATE_PATH),
        }
    }

    pub fn with_dock_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dock_state_path = path.into();
        self
    }

    /// Library API version, `YYYYMMDD.NNN`.
    pub fn api_version(&self) -> &'static str {
        API_VERSION
    }

    /// Device serial number from the OS property store.
    pub fn serial_number(&self) -> std::io::Result<String> {
        self.properties.get(SERIAL_PROPERTY)
    }

    /// Which cradle or hub the device is currently docked in.
    pub fn device_type(&self) -> GpioResult<DeviceType> {
        let raw = fs::read_to_string(&self.dock_state_path).map_err(|e| {
            GpioError::io(format!("reading {}", self.dock_state_path.display()), &e)
        })?;
        let state: u8 = raw.trim().parse().map_err(|_| GpioError::BadValue {
            raw: raw.clone(),
        })?;
        Ok(DeviceType::from_dock_state(state))
    }
}
