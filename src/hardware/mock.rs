//! Mock MCU implementation for testing and development.

use crate::core::constants::ANALOG_CHANNEL_COUNT;
use crate::core::types::{
    BatteryCondition, LedState, PowerOnReason, PowerOnThreshold, RtcCalibration,
};
use crate::hardware::error::{McuError, McuResult};
use crate::hardware::mcu::McuInterface;
use std::collections::{HashMap, HashSet};

/// Scriptable in-memory MCU.
///
/// Every register the real MCU exposes can be preset, individual channels
/// can be forced to fail, and calls are counted so tests can assert that
/// parameter validation rejected a request before it reached the hardware
/// layer.
pub struct MockMcu {
    connected: bool,
    simulate_errors: bool,
    error_probability: f32,
    mcu_version: String,
    fpga_version: u32,
    voltages: [i32; ANALOG_CHANNEL_COUNT],
    failing_channels: HashSet<u8>,
    leds: [LedState; 3],
    threshold: PowerOnThreshold,
    power_on_reason: PowerOnReason,
    rtc_date_time: String,
    rtc_cal: RtcCalibration,
    battery: BatteryCondition,
    gpios: HashMap<u16, u8>,
    power_off_requests: Vec<u32>,
    call_count: u32,
}

impl MockMcu {
    pub fn new() -> Self {
        Self {
            connected: true,
            simulate_errors: false,
            error_probability: 0.0,
            mcu_version: "A.2.3.0".to_string(),
            fpga_version: 0x4100_0002,
            voltages: [0; ANALOG_CHANNEL_COUNT],
            failing_channels: HashSet::new(),
            leds: [
                LedState::new(LedState::RIGHT),
                LedState::new(LedState::CENTER),
                LedState::new(LedState::LEFT),
            ],
            threshold: PowerOnThreshold {
                wiggle_count: 3,
                wiggle_sample_period_ms: 1000,
                ignition_threshold_mv: 6000,
            },
            power_on_reason: PowerOnReason(0x0001),
            rtc_date_time: "2016-08-25 16:00:55.11".to_string(),
            rtc_cal: RtcCalibration {
                digital: 0,
                analog: 0,
            },
            battery: BatteryCondition::Good,
            gpios: HashMap::new(),
            power_off_requests: Vec::new(),
            call_count: 0,
        }
    }

    /// Preset a channel voltage in millivolts.
    pub fn set_voltage(&mut self, channel: u8, millivolts: i32) {
        self.voltages[usize::from(channel)] = millivolts;
    }

    /// Force reads of one channel to fail with a receive error.
    pub fn fail_channel(&mut self, channel: u8) {
        self.failing_channels.insert(channel);
    }

    pub fn set_power_on_reason(&mut self, reason: PowerOnReason) {
        self.power_on_reason = reason;
    }

    pub fn set_rtc(&mut self, date_time: impl Into<String>) {
        self.rtc_date_time = date_time.into();
    }

    pub fn set_battery(&mut self, condition: BatteryCondition) {
        self.battery = condition;
    }

    /// Enable probabilistic error injection (0.0 to 1.0).
    pub fn simulate_errors(&mut self, enable: bool, probability: f32) {
        self.simulate_errors = enable;
        self.error_probability = probability.clamp(0.0, 1.0);
    }

    /// Simulate connection loss.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Restore the connection.
    pub fn reconnect(&mut self) {
        self.connected = true;
    }

    /// Number of interface calls that reached this mock.
    pub fn call_count(&self) -> u32 {
        self.call_count
    }

    /// Power-off requests received, as wait times in seconds.
    pub fn power_off_requests(&self) -> &[u32] {
        &self.power_off_requests
    }

    fn enter(&mut self) -> McuResult<()> {
        self.call_count += 1;
        if !self.connected {
            return Err(McuError::ConnectionFailure);
        }
        if self.should_simulate_error() {
            return Err(McuError::ReceiveFailure);
        }
        Ok(())
    }

    fn should_simulate_error(&self) -> bool {
        if !self.simulate_errors {
            return false;
        }
        use rand::Rng;
        let mut rng = rand::thread_rng();
        rng.gen::<f32>() < self.error_probability
    }
}

impl Default for MockMcu {
    fn default() -> Self {
        Self::new()
    }
}

impl McuInterface for MockMcu {
    fn mcu_version(&mut self) -> McuResult<String> {
        self.enter()?;
        Ok(self.mcu_version.clone())
    }

    fn fpga_version(&mut self) -> McuResult<u32> {
        self.enter()?;
        Ok(self.fpga_version)
    }

    fn adc_or_gpi_voltage(&mut self, channel: u8) -> McuResult<i32> {
        self.enter()?;
        if self.failing_channels.contains(&channel) {
            return Err(McuError::ReceiveFailure);
        }
        Ok(self.voltages[usize::from(channel)])
    }

    fn led_status(&mut self, led: u8) -> McuResult<LedState> {
        self.enter()?;
        Ok(self.leds[usize::from(led)])
    }

    fn set_led(&mut self, led: u8, brightness: u8, rgb: u32) -> McuResult<()> {
        self.enter()?;
        self.leds[usize::from(led)] = LedState::from_rgb(led, rgb, brightness);
        Ok(())
    }

    fn power_on_threshold(&mut self) -> McuResult<PowerOnThreshold> {
        self.enter()?;
        Ok(self.threshold)
    }

    fn power_on_reason(&mut self) -> McuResult<PowerOnReason> {
        self.enter()?;
        Ok(self.power_on_reason)
    }

    fn set_device_power_off(&mut self, wait_seconds: u32) -> McuResult<()> {
        self.enter()?;
        self.power_off_requests.push(wait_seconds);
        Ok(())
    }

    fn rtc_date_time(&mut self) -> McuResult<String> {
        self.enter()?;
        Ok(self.rtc_date_time.clone())
    }

    fn set_rtc_date_time(&mut self, date_time: &str) -> McuResult<()> {
        self.enter()?;
        self.rtc_date_time = date_time.to_string();
        Ok(())
    }

    fn rtc_cal_reg(&mut self) -> McuResult<RtcCalibration> {
        self.enter()?;
        Ok(self.rtc_cal)
    }

    fn check_rtc_battery(&mut self) -> McuResult<BatteryCondition> {
        self.enter()?;
        Ok(self.battery)
    }

    fn gpio_state(&mut self, gpio: u16) -> McuResult<u8> {
        self.enter()?;
        Ok(self.gpios.get(&gpio).copied().unwrap_or(0))
    }

    fn set_gpio_state(&mut self, gpio: u16, value: u8) -> McuResult<()> {
        self.enter()?;
        self.gpios.insert(gpio, value & 1);
        Ok(())
    }
}
