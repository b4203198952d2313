//! MCU capability trait.

use crate::core::types::{
    BatteryCondition, LedState, PowerOnReason, PowerOnThreshold, RtcCalibration,
};
use crate::hardware::error::McuResult;

/// Capability interface to the device microcontroller.
///
/// Every operation follows the result-code-first convention: the transport
/// interprets the leading status code of each response and surfaces negative
/// codes as [`crate::hardware::McuError`], so implementors never return
/// sentinel payloads.
///
/// Implementations are not required to be thread safe; the facade serializes
/// access.
pub trait McuInterface: Send {
    /// MCU firmware version, e.g. `"A.2.3.0"`.
    fn mcu_version(&mut self) -> McuResult<String>;

    /// Raw FPGA version word, e.g. `0x41000002`.
    fn fpga_version(&mut self) -> McuResult<u32>;

    /// Voltage of an ADC/GPI channel in millivolts.
    fn adc_or_gpi_voltage(&mut self, channel: u8) -> McuResult<i32>;

    /// Current color and brightness of a status LED.
    fn led_status(&mut self, led: u8) -> McuResult<LedState>;

    /// Set a status LED. `rgb` is a packed `0xRRGGBB` word.
    fn set_led(&mut self, led: u8, brightness: u8, rgb: u32) -> McuResult<()>;

    /// Wiggle/ignition power-on threshold configuration.
    fn power_on_threshold(&mut self) -> McuResult<PowerOnThreshold>;

    /// Reason bitmask for the last application-processor power up.
    fn power_on_reason(&mut self) -> McuResult<PowerOnReason>;

    /// Shut the application processor down into low-power mode after
    /// `wait_seconds`. With ignition on the unit shuts down and wakes back
    /// up.
    fn set_device_power_off(&mut self, wait_seconds: u32) -> McuResult<()>;

    /// RTC date-time string, `YYYY-MM-DD HH:MM:SS.CC`.
    fn rtc_date_time(&mut self) -> McuResult<String>;

    /// Set the RTC from a pre-validated date-time string. Centiseconds are
    /// not applied by the MCU.
    fn set_rtc_date_time(&mut self, date_time: &str) -> McuResult<()>;

    /// Digital and analog RTC calibration registers.
    fn rtc_cal_reg(&mut self) -> McuResult<RtcCalibration>;

    /// Condition of the RTC backup battery.
    fn check_rtc_battery(&mut self) -> McuResult<BatteryCondition>;

    /// Debug read of an MCU-mapped GPIO. Returns 0 or 1.
    fn gpio_state(&mut self, gpio: u16) -> McuResult<u8>;

    /// Debug write of an MCU-mapped GPIO.
    fn set_gpio_state(&mut self, gpio: u16, value: u8) -> McuResult<()>;
}
