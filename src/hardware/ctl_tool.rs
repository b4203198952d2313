//! MCU transport backed by the on-device `mctl` control tool.
//!
//! The privileged `mctl` binary owns the socket to the MCU daemon; this
//! transport invokes `mctl api <opcode> [args...]` and parses the
//! comma-separated `KEY=value` fields it prints. Opcodes live in one table
//! so a port to a different tool build only touches the constants.

use crate::core::types::{
    BatteryCondition, LedState, PowerOnReason, PowerOnThreshold, RtcCalibration,
};
use crate::hardware::error::{McuError, McuResult};
use crate::hardware::mcu::McuInterface;
use log::{debug, error};
use std::collections::HashMap;
use std::process::Command;

const OP_GET_MCU_VERSION: &str = "02000";
const OP_GET_FPGA_VERSION: &str = "02010";
const OP_GET_ADC_VOLTAGE: &str = "02020";
const OP_GET_POWER_ON_THRESHOLD: &str = "02030";
const OP_GET_POWER_ON_REASON: &str = "02040";
const OP_GET_LED_STATUS: &str = "02050";
const OP_SET_LED: &str = "02060";
const OP_SET_POWER_OFF: &str = "02070";
const OP_GET_RTC_DATE_TIME: &str = "02080";
const OP_SET_RTC_DATE_TIME: &str = "02090";
const OP_GET_RTC_CAL_REG: &str = "020A0";
const OP_CHECK_RTC_BATTERY: &str = "020B0";
const OP_GET_GPIO_STATE: &str = "020C0";
const OP_SET_GPIO_STATE: &str = "020D0";

/// `McuInterface` implementation that shells out to the control tool.
pub struct CtlToolMcu {
    tool: String,
}

impl CtlToolMcu {
    /// Use the `mctl` tool from `PATH`.
    pub fn new() -> Self {
        Self::with_tool("mctl")
    }

    /// Use a specific tool binary.
    pub fn with_tool(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    /// Run one `api` command and return its parsed response fields.
    fn run(&self, opcode: &str, args: &[&str]) -> McuResult<HashMap<String, String>> {
        let output = Command::new(&self.tool)
            .arg("api")
            .arg(opcode)
            .args(args)
            .output()
            .map_err(|e| {
                error!("failed to spawn {}: {}", self.tool, e);
                McuError::ConnectionFailure
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let line = stdout.lines().next().unwrap_or("");
        if line.is_empty() {
            if output.status.success() {
                return Err(McuError::ReceiveFailure);
            }
            return Err(McuError::ConnectionFailure);
        }

        let fields = parse_fields(line);
        if let Some(code) = fields.get("RESULT") {
            let code: i32 = code.parse().map_err(|_| McuError::InvalidResponse {
                details: format!("unparseable result code {:?}", code),
            })?;
            if code < 0 {
                error!("{} api {} failed with code {}", self.tool, opcode, code);
                return Err(McuError::from_code(code));
            }
        } else if !output.status.success() {
            return Err(McuError::ReceiveFailure);
        }

        debug!("{} api {} ok", self.tool, opcode);
        Ok(fields)
    }

    fn field<'a>(fields: &'a HashMap<String, String>, key: &str) -> McuResult<&'a str> {
        fields
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| McuError::InvalidResponse {
                details: format!("missing field {}", key),
            })
    }

    fn field_int<T>(fields: &HashMap<String, String>, key: &str) -> McuResult<T>
    where
        T: std::str::FromStr,
    {
        let raw = Self::field(fields, key)?;
        raw.parse().map_err(|_| McuError::InvalidResponse {
            details: format!("field {}={:?} is not numeric", key, raw),
        })
    }
}

impl Default for CtlToolMcu {
    fn default() -> Self {
        Self::new()
    }
}

impl McuInterface for CtlToolMcu {
    fn mcu_version(&mut self) -> McuResult<String> {
        let fields = self.run(OP_GET_MCU_VERSION, &[])?;
        Ok(Self::field(&fields, "VERSION")?.to_string())
    }

    fn fpga_version(&mut self) -> McuResult<u32> {
        let fields = self.run(OP_GET_FPGA_VERSION, &[])?;
        let raw = Self::field(&fields, "VERSION")?;
        u32::from_str_radix(raw.trim_start_matches("0x"), 16).map_err(|_| {
            McuError::InvalidResponse {
                details: format!("FPGA version {:?} is not hex", raw),
            }
        })
    }

    fn adc_or_gpi_voltage(&mut self, channel: u8) -> McuResult<i32> {
        let fields = self.run(OP_GET_ADC_VOLTAGE, &[&channel.to_string()])?;
        Self::field_int(&fields, "MILLIVOLTS")
    }

    fn led_status(&mut self, led: u8) -> McuResult<LedState> {
        let fields = self.run(OP_GET_LED_STATUS, &[&led.to_string()])?;
        Ok(LedState {
            led,
            red: Self::field_int(&fields, "RED")?,
            green: Self::field_int(&fields, "GREEN")?,
            blue: Self::field_int(&fields, "BLUE")?,
            brightness: Self::field_int(&fields, "BRIGHTNESS")?,
        })
    }

    fn set_led(&mut self, led: u8, brightness: u8, rgb: u32) -> McuResult<()> {
        self.run(
            OP_SET_LED,
            &[
                &led.to_string(),
                &brightness.to_string(),
                &rgb.to_string(),
            ],
        )?;
        Ok(())
    }

    fn power_on_threshold(&mut self) -> McuResult<PowerOnThreshold> {
        let fields = self.run(OP_GET_POWER_ON_THRESHOLD, &[])?;
        Ok(PowerOnThreshold {
            wiggle_count: Self::field_int(&fields, "WIGGLE_COUNT")?,
            wiggle_sample_period_ms: Self::field_int(&fields, "WIGGLE_SAMPLE_PERIOD")?,
            ignition_threshold_mv: Self::field_int(&fields, "IGNITION_THRESHOLD")?,
        })
    }

    fn power_on_reason(&mut self) -> McuResult<PowerOnReason> {
        let fields = self.run(OP_GET_POWER_ON_REASON, &[])?;
        Ok(PowerOnReason(Self::field_int(&fields, "REASON")?))
    }

    fn set_device_power_off(&mut self, wait_seconds: u32) -> McuResult<()> {
        self.run(OP_SET_POWER_OFF, &[&wait_seconds.to_string()])?;
        Ok(())
    }

    fn rtc_date_time(&mut self) -> McuResult<String> {
        let fields = self.run(OP_GET_RTC_DATE_TIME, &[])?;
        Ok(Self::field(&fields, "DATETIME")?.to_string())
    }

    fn set_rtc_date_time(&mut self, date_time: &str) -> McuResult<()> {
        self.run(OP_SET_RTC_DATE_TIME, &[date_time])?;
        Ok(())
    }

    fn rtc_cal_reg(&mut self) -> McuResult<RtcCalibration> {
        let fields = self.run(OP_GET_RTC_CAL_REG, &[])?;
        // A register the tool could not read is reported as absent.
        let digital = Self::field_int(&fields, "DIGITAL_CAL").unwrap_or(RtcCalibration::INVALID);
        let analog = Self::field_int(&fields, "ANALOG_CAL").unwrap_or(RtcCalibration::INVALID);
        Ok(RtcCalibration { digital, analog })
    }

    fn check_rtc_battery(&mut self) -> McuResult<BatteryCondition> {
        let fields = self.run(OP_CHECK_RTC_BATTERY, &[])?;
        let state: u8 = Self::field_int(&fields, "BATTERY")?;
        if state != 0 {
            Ok(BatteryCondition::Good)
        } else {
            Ok(BatteryCondition::LowOrMissing)
        }
    }

    fn gpio_state(&mut self, gpio: u16) -> McuResult<u8> {
        let fields = self.run(OP_GET_GPIO_STATE, &[&gpio.to_string()])?;
        Self::field_int(&fields, "VALUE")
    }

    fn set_gpio_state(&mut self, gpio: u16, value: u8) -> McuResult<()> {
        self.run(
            OP_SET_GPIO_STATE,
            &[&gpio.to_string(), &(value & 1).to_string()],
        )?;
        Ok(())
    }
}

/// Parse one `KEY=value, KEY=value, ...` response line.
fn parse_fields(line: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for token in line.split(',') {
        if let Some((key, value)) = token.split_once('=') {
            fields.insert(
                key.trim().to_uppercase(),
                value.trim().trim_matches('"').to_string(),
            );
        }
    }
    fields
}
