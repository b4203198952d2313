//! Hardware abstraction library for the OBC5 in-vehicle telematics device
//! family (OBC5, SmartHub, Basic Cradle, Smart Cradle).
//!
//! Analog/digital I/O, status LEDs, RTC, firmware versions, power-on
//! reasons and GPIO outputs, reached through the MCU control tool and the
//! kernel sysfs GPIO interface.

pub mod api;
pub mod core;
pub mod gpio;
pub mod hardware;
pub mod info;
pub mod validation;

// Re-export commonly used types
pub use crate::api::{Hal, HalConfig, HalError, HalResult};
pub use crate::core::types::{
    BatteryCondition, DeviceType, LedState, PowerOnReason, PowerOnThreshold, RtcCalibration,
};
pub use crate::gpio::{GpioError, OutputWriter, PropertyStore, SysfsPin, SystemProperties};
pub use crate::hardware::{CtlToolMcu, McuError, McuInterface, McuResult, MockMcu};
pub use crate::info::DeviceInfo;
pub use crate::validation::ArgumentError;
