//! Core constants and data types.

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::{
    BatteryCondition, DeviceType, LedState, PowerOnReason, PowerOnThreshold, RtcCalibration,
};
