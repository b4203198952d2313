//! Plain data types shared across the HAL.

use crate::core::constants::{
    POWER_ON_ARM_LOCKUP, POWER_ON_IGNITION_TRIGGER, POWER_ON_WATCHDOG_RESET,
    POWER_ON_WIGGLE_TRIGGER,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of one of the three front-panel status LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedState {
    /// LED position: 0 right, 1 center, 2 left.
    pub led: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// 0 means the LED is off.
    pub brightness: u8,
}

impl LedState {
    /// Right LED position.
    pub const RIGHT: u8 = 0;
    /// Center LED position.
    pub const CENTER: u8 = 1;
    /// Left LED position.
    pub const LEFT: u8 = 2;

    pub fn new(led: u8) -> Self {
        Self {
            led,
            red: 0,
            green: 0,
            blue: 0,
            brightness: 0,
        }
    }

    /// Build from a packed `0xRRGGBB` color word.
    pub fn from_rgb(led: u8, rgb: u32, brightness: u8) -> Self {
        Self {
            led,
            red: ((rgb >> 16) & 0xFF) as u8,
            green: ((rgb >> 8) & 0xFF) as u8,
            blue: (rgb & 0xFF) as u8,
            brightness,
        }
    }

    /// Packed `0xRRGGBB` color word.
    pub fn rgb(&self) -> u32 {
        (u32::from(self.red) << 16) | (u32::from(self.green) << 8) | u32::from(self.blue)
    }
}

/// Reason bitmask reported by the MCU for the last application-processor
/// power up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerOnReason(pub u16);

impl PowerOnReason {
    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn ignition_trigger(&self) -> bool {
        self.0 & POWER_ON_IGNITION_TRIGGER != 0
    }

    pub fn wiggle_trigger(&self) -> bool {
        self.0 & POWER_ON_WIGGLE_TRIGGER != 0
    }

    pub fn arm_lockup(&self) -> bool {
        self.0 & POWER_ON_ARM_LOCKUP != 0
    }

    pub fn watchdog_reset(&self) -> bool {
        self.0 & POWER_ON_WATCHDOG_RESET != 0
    }
}

/// Power-on threshold configuration held by the MCU.
///
/// The wiggle sample period says how long samples are collected before
/// deciding whether a wiggle event happened; the ignition threshold is the
/// voltage above which the ignition line counts as on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerOnThreshold {
    pub wiggle_count: u16,
    pub wiggle_sample_period_ms: u16,
    pub ignition_threshold_mv: u16,
}

/// RTC calibration register pair. A value of -1 marks a register that could
/// not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtcCalibration {
    pub digital: i32,
    pub analog: i32,
}

impl RtcCalibration {
    pub const INVALID: i32 = -1;
}

/// Condition of the RTC backup battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryCondition {
    Good,
    LowOrMissing,
}

impl fmt::Display for BatteryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatteryCondition::Good => write!(f, "Good"),
            BatteryCondition::LowOrMissing => write!(f, "Low or not present"),
        }
    }
}

/// Physical cradle or hub the device is seated in, derived from the dock
/// switch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    /// Undocked OBC5.
    Obc5,
    BasicCradle,
    SmartCradle,
    SmartHub,
    /// Dock state value with no known mapping.
    Unknown(u8),
}

impl DeviceType {
    /// Map a raw dock switch state to a device type.
    pub fn from_dock_state(raw: u8) -> Self {
        match raw {
            0 => DeviceType::Obc5,
            1 => DeviceType::BasicCradle,
            2 => DeviceType::SmartCradle,
            3 => DeviceType::SmartHub,
            other => DeviceType::Unknown(other),
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Obc5 => write!(f, "OBC5"),
            DeviceType::BasicCradle => write!(f, "Basic Cradle"),
            DeviceType::SmartCradle => write!(f, "Smart Cradle"),
            DeviceType::SmartHub => write!(f, "SmartHub"),
            DeviceType::Unknown(raw) => write!(f, "Unknown dock state {}", raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_led_rgb_round_trip() {
        let led = LedState::from_rgb(LedState::RIGHT, 0xFF8040, 255);
        assert_eq!(led.red, 0xFF);
        assert_eq!(led.green, 0x80);
        assert_eq!(led.blue, 0x40);
        assert_eq!(led.rgb(), 0xFF8040);
    }

    #[test]
    fn test_power_on_reason_bits() {
        let reason = PowerOnReason(0x0005);
        assert!(reason.ignition_trigger());
        assert!(!reason.wiggle_trigger());
        assert!(reason.arm_lockup());
        assert!(!reason.watchdog_reset());
    }

    #[test]
    fn test_device_type_mapping() {
        assert_eq!(DeviceType::from_dock_state(0), DeviceType::Obc5);
        assert_eq!(DeviceType::from_dock_state(3), DeviceType::SmartHub);
        assert_eq!(DeviceType::from_dock_state(9), DeviceType::Unknown(9));
    }

    #[test]
    fn test_battery_condition_display() {
        assert_eq!(BatteryCondition::Good.to_string(), "Good");
        assert_eq!(
            BatteryCondition::LowOrMissing.to_string(),
            "Low or not present"
        );
    }
}
