//! Hardware access facade for the OBC5 device family.

use crate::api::types::{HalConfig, HalError, HalResult};
use crate::core::constants::{
    ANALOG_CHANNEL_COUNT, CAN1_J1708_PWR_ENABLE_GPIO, DIGITAL_INPUT_COUNT, GPIO_INPUT_BASE,
};
use crate::core::types::{
    BatteryCondition, DeviceType, LedState, PowerOnReason, PowerOnThreshold, RtcCalibration,
};
use crate::gpio::output::OutputWriter;
use crate::gpio::pin::SysfsPin;
use crate::gpio::properties::{PropertyStore, SystemProperties};
use crate::hardware::ctl_tool::CtlToolMcu;
use crate::hardware::mcu::McuInterface;
use crate::info::DeviceInfo;
use crate::validation::{
    check_analog_channel, check_digital_input, check_led_index, check_rgb, check_rtc_date_time,
};
use log::{debug, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Property the OS init system watches for shutdown requests.
const POWER_CTL_PROPERTY: &str = "sys.powerctl";

/// Handle to the device hardware.
///
/// The MCU transport is not documented as thread safe, so every MCU
/// operation takes an internal mutex; calls from concurrent threads
/// serialize. A validated output set can hold a caller for the full poll
/// budget (several hundred milliseconds) and cannot be cancelled mid-flight.
pub struct Hal {
    mcu: Mutex<Box<dyn McuInterface>>,
    outputs: OutputWriter,
    properties: Arc<dyn PropertyStore>,
    info: DeviceInfo,
    config: HalConfig,
}

impl Hal {
    /// Open the real device using the configured control tool and system
    /// properties.
    pub fn new(config: HalConfig) -> HalResult<Self> {
        let mcu = Box::new(CtlToolMcu::with_tool(config.tool.clone()));
        Self::from_parts(mcu, Arc::new(SystemProperties), config)
    }

    /// Assemble a handle from explicit parts. Tests inject a mock MCU and a
    /// fake property store here.
    pub fn from_parts(
        mcu: Box<dyn McuInterface>,
        properties: Arc<dyn PropertyStore>,
        config: HalConfig,
    ) -> HalResult<Self> {
        config.validate()?;
        let outputs = OutputWriter::new(properties.clone())
            .with_script_dir(&config.script_dir)
            .with_sysfs_root(&config.sysfs_root)
            .with_trigger_property(&config.trigger_property)
            .with_poll(
                config.output_poll_budget,
                Duration::from_millis(config.output_poll_interval_ms),
                Duration::from_millis(config.output_initial_delay_ms),
            );
        let info = DeviceInfo::new(properties.clone())
            .with_dock_state_path(&config.dock_state_path);
        Ok(Self {
            mcu: Mutex::new(mcu),
            outputs,
            properties,
            info,
            config,
        })
    }

    pub fn config(&self) -> &HalConfig {
        &self.config
    }

    fn mcu(&self) -> MutexGuard<'_, Box<dyn McuInterface>> {
        self.mcu.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Voltage of one ADC/GPI channel in millivolts.
    pub fn analog_input(&self, channel: u8) -> HalResult<i32> {
        check_analog_channel(channel)?;
        let millivolts = self.mcu().adc_or_gpi_voltage(channel)?;
        debug!("analog channel {}: {} mV", channel, millivolts);
        Ok(millivolts)
    }

    /// Voltages of all 12 analog channels, in channel order.
    ///
    /// The sweep stops at the first channel that fails; that slot and every
    /// later one keep the -1 sentinel.
    pub fn all_analog_inputs(&self) -> [i32; ANALOG_CHANNEL_COUNT] {
        let mut values = [-1; ANALOG_CHANNEL_COUNT];
        let mut mcu = self.mcu();
        for channel in 0..ANALOG_CHANNEL_COUNT as u8 {
            match mcu.adc_or_gpi_voltage(channel) {
                Ok(millivolts) => values[usize::from(channel)] = millivolts,
                Err(e) => {
                    warn!("analog sweep stopped at channel {}: {}", channel, e);
                    break;
                }
            }
        }
        values
    }

    /// Level of one automotive digital input (sysfs GPIO 692+N): 0 or 1.
    pub fn input_state(&self, channel: u8) -> HalResult<u8> {
        check_digital_input(channel)?;
        let pin = SysfsPin::with_root(
            GPIO_INPUT_BASE + u16::from(channel),
            &self.config.sysfs_root,
        );
        Ok(pin.read()?)
    }

    /// Levels of all 8 automotive inputs; -1 sentinel fill from the first
    /// failed pin onward.
    pub fn all_input_states(&self) -> [i32; DIGITAL_INPUT_COUNT] {
        let mut values = [-1; DIGITAL_INPUT_COUNT];
        for channel in 0..DIGITAL_INPUT_COUNT as u8 {
            let pin = SysfsPin::with_root(
                GPIO_INPUT_BASE + u16::from(channel),
                &self.config.sysfs_root,
            );
            match pin.read() {
                Ok(level) => values[usize::from(channel)] = i32::from(level),
                Err(e) => {
                    warn!("input sweep stopped at channel {}: {}", channel, e);
                    break;
                }
            }
        }
        values
    }

    /// I/O connections seen at power up, as a reason bitmask.
    pub fn power_up_ignition_state(&self) -> HalResult<PowerOnReason> {
        let reason = self.mcu().power_on_reason()?;
        debug!("power on reason: {:#06x}", reason.bits());
        Ok(reason)
    }

    /// MCU firmware version, e.g. `"A.2.3.0"`.
    pub fn mcu_version(&self) -> HalResult<String> {
        Ok(self.mcu().mcu_version()?)
    }

    /// FPGA version as a lower-hex string, e.g. `"41000002"`.
    pub fn fpga_version(&self) -> HalResult<String> {
        let version = self.mcu().fpga_version()?;
        Ok(format!("{:x}", version))
    }

    /// Current color and brightness of a status LED.
    pub fn led_status(&self, led: u8) -> HalResult<LedState> {
        check_led_index(led)?;
        Ok(self.mcu().led_status(led)?)
    }

    /// Set a status LED. `rgb` is a packed `0xRRGGBB` word; brightness 0
    /// turns the LED off.
    pub fn set_led(&self, led: u8, brightness: u8, rgb: u32) -> HalResult<()> {
        check_led_index(led)?;
        check_rgb(rgb)?;
        self.mcu().set_led(led, brightness, rgb)?;
        debug!("led {} set to {:#08x} at brightness {}", led, rgb, brightness);
        Ok(())
    }

    /// RTC date-time string, `YYYY-MM-DD HH:MM:SS.CC`.
    pub fn rtc_date_time(&self) -> HalResult<String> {
        Ok(self.mcu().rtc_date_time()?)
    }

    /// Set the MCU RTC. The string must match the documented format
    /// exactly; anything else is rejected before the MCU is touched.
    /// Centiseconds are not applied by the MCU.
    pub fn set_rtc_date_time(&self, date_time: &str) -> HalResult<()> {
        check_rtc_date_time(date_time)?;
        Ok(self.mcu().set_rtc_date_time(date_time)?)
    }

    /// Digital and analog RTC calibration registers.
    pub fn rtc_cal_reg(&self) -> HalResult<RtcCalibration> {
        Ok(self.mcu().rtc_cal_reg()?)
    }

    /// Condition of the RTC backup battery.
    pub fn check_rtc_battery(&self) -> HalResult<BatteryCondition> {
        Ok(self.mcu().check_rtc_battery()?)
    }

    /// Wiggle/ignition power-on threshold configuration.
    pub fn power_on_threshold(&self) -> HalResult<PowerOnThreshold> {
        Ok(self.mcu().power_on_threshold()?)
    }

    /// Shut the application processor down into low-power mode after
    /// `wait_seconds`. With ignition on the unit shuts down and wakes back
    /// up.
    pub fn set_device_power_off(&self, wait_seconds: u32) -> HalResult<()> {
        Ok(self.mcu().set_device_power_off(wait_seconds)?)
    }

    /// Request an OS shutdown through the init system.
    pub fn os_shutdown(&self) -> HalResult<()> {
        self.properties
            .set(POWER_CTL_PROPERTY, "shutdown")
            .map_err(|e| HalError::Property {
                name: POWER_CTL_PROPERTY.to_string(),
                details: e.to_string(),
            })
    }

    /// Drive a digital output through the privileged-executor path. See
    /// [`OutputWriter::set`] for the validation contract.
    pub fn set_output(&self, gpio: u16, high: bool, validate: bool) -> HalResult<()> {
        Ok(self.outputs.set(gpio, high, validate)?)
    }

    /// Debug read of an MCU-mapped GPIO.
    pub fn gpio_state_debug(&self, gpio: u16) -> HalResult<u8> {
        Ok(self.mcu().gpio_state(gpio)?)
    }

    /// Debug write of an MCU-mapped GPIO.
    pub fn set_gpio_state_debug(&self, gpio: u16, high: bool) -> HalResult<()> {
        Ok(self.mcu().set_gpio_state(gpio, u8::from(high))?)
    }

    /// Current state of the CAN1/J1708 transceiver power enable.
    pub fn can1_j1708_power_enable(&self) -> HalResult<u8> {
        self.gpio_state_debug(CAN1_J1708_PWR_ENABLE_GPIO)
    }

    /// Switch CAN1/J1708 transceiver power.
    pub fn set_can1_j1708_power_enable(&self, enable: bool) -> HalResult<()> {
        self.set_gpio_state_debug(CAN1_J1708_PWR_ENABLE_GPIO, enable)
    }

    /// Device serial number.
    pub fn serial_number(&self) -> HalResult<String> {
        self.info.serial_number().map_err(|e| HalError::Property {
            name: crate::info::SERIAL_PROPERTY.to_string(),
            details: e.to_string(),
        })
    }

    /// Which cradle or hub the device is docked in.
    pub fn device_type(&self) -> HalResult<DeviceType> {
        Ok(self.info.device_type()?)
    }

    /// Library API version.
    pub fn api_version(&self) -> &'static str {
        self.info.api_version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::error::McuResult;
    use crate::hardware::mock::MockMcu;
    use std::collections::HashMap;
    use std::fs;
    use std::io;
    use std::path::PathBuf;

    struct MapProperties(Mutex<HashMap<String, String>>);

    impl MapProperties {
        fn new() -> Self {
            Self(Mutex::new(HashMap::new()))
        }
    }

    impl PropertyStore for MapProperties {
        fn get(&self, name: &str) -> io::Result<String> {
            Ok(self.0.lock().unwrap().get(name).cloned().unwrap_or_default())
        }

        fn set(&self, name: &str, value: &str) -> io::Result<()> {
            self.0
                .lock()
                .unwrap()
                .insert(name.to_string(), value.to_string());
            Ok(())
        }
    }

    /// MCU adapter that leaves the underlying mock reachable from the test
    /// after the facade takes ownership.
    struct SharedMcu(Arc<Mutex<MockMcu>>);

    impl McuInterface for SharedMcu {
        fn mcu_version(&mut self) -> McuResult<String> {
            self.0.lock().unwrap().mcu_version()
        }
        fn fpga_version(&mut self) -> McuResult<u32> {
            self.0.lock().unwrap().fpga_version()
        }
        fn adc_or_gpi_voltage(&mut self, channel: u8) -> McuResult<i32> {
            self.0.lock().unwrap().adc_or_gpi_voltage(channel)
        }
        fn led_status(&mut self, led: u8) -> McuResult<LedState> {
            self.0.lock().unwrap().led_status(led)
        }
        fn set_led(&mut self, led: u8, brightness: u8, rgb: u32) -> McuResult<()> {
            self.0.lock().unwrap().set_led(led, brightness, rgb)
        }
        fn power_on_threshold(&mut self) -> McuResult<PowerOnThreshold> {
            self.0.lock().unwrap().power_on_threshold()
        }
        fn power_on_reason(&mut self) -> McuResult<PowerOnReason> {
            self.0.lock().unwrap().power_on_reason()
        }
        fn set_device_power_off(&mut self, wait_seconds: u32) -> McuResult<()> {
            self.0.lock().unwrap().set_device_power_off(wait_seconds)
        }
        fn rtc_date_time(&mut self) -> McuResult<String> {
            self.0.lock().unwrap().rtc_date_time()
        }
        fn set_rtc_date_time(&mut self, date_time: &str) -> McuResult<()> {
            self.0.lock().unwrap().set_rtc_date_time(date_time)
        }
        fn rtc_cal_reg(&mut self) -> McuResult<RtcCalibration> {
            self.0.lock().unwrap().rtc_cal_reg()
        }
        fn check_rtc_battery(&mut self) -> McuResult<BatteryCondition> {
            self.0.lock().unwrap().check_rtc_battery()
        }
        fn gpio_state(&mut self, gpio: u16) -> McuResult<u8> {
            self.0.lock().unwrap().gpio_state(gpio)
        }
        fn set_gpio_state(&mut self, gpio: u16, value: u8) -> McuResult<()> {
            self.0.lock().unwrap().set_gpio_state(gpio, value)
        }
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "obc-hal-hal-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn test_hal(tag: &str) -> (Hal, Arc<Mutex<MockMcu>>, PathBuf) {
        let dir = scratch_dir(tag);
        let mock = Arc::new(Mutex::new(MockMcu::new()));
        let config = HalConfig {
            sysfs_root: dir.join("sys"),
            script_dir: dir.clone(),
            dock_state_path: dir.join("dock-state"),
            output_poll_budget: 4,
            output_poll_interval_ms: 1,
            output_initial_delay_ms: 1,
            ..Default::default()
        };
        fs::create_dir_all(dir.join("sys")).unwrap();
        let hal = Hal::from_parts(
            Box::new(SharedMcu(mock.clone())),
            Arc::new(MapProperties::new()),
            config,
        )
        .unwrap();
        (hal, mock, dir)
    }

    #[test]
    fn test_analog_input_validation_precedes_mcu_call() {
        let (hal, mock, _dir) = test_hal("analog-validate");

        assert!(matches!(
            hal.analog_input(12),
            Err(HalError::Argument(_))
        ));
        assert_eq!(mock.lock().unwrap().call_count(), 0);

        mock.lock().unwrap().set_voltage(8, 12400);
        assert_eq!(hal.analog_input(8).unwrap(), 12400);
    }

    #[test]
    fn test_all_analog_inputs_sentinel_fill() {
        let (hal, mock, _dir) = test_hal("analog-sweep");
        {
            let mut mock = mock.lock().unwrap();
            for channel in 0..12 {
                mock.set_voltage(channel, 1000 + i32::from(channel));
            }
            mock.fail_channel(4);
        }

        let values = hal.all_analog_inputs();
        assert_eq!(&values[..4], &[1000, 1001, 1002, 1003]);
        // Failure at channel 4 leaves that slot and everything after at -1.
        assert_eq!(&values[4..], &[-1; 8]);
    }

    #[test]
    fn test_set_led_rejects_bad_parameters_without_mcu_call() {
        let (hal, mock, _dir) = test_hal("led-validate");

        assert!(matches!(hal.set_led(3, 255, 0xFF0000), Err(HalError::Argument(_))));
        assert!(matches!(
            hal.set_led(0, 255, 0x1FF_0000),
            Err(HalError::Argument(_))
        ));
        assert_eq!(mock.lock().unwrap().call_count(), 0);

        hal.set_led(LedState::CENTER, 128, 0x00FF00).unwrap();
        let led = hal.led_status(LedState::CENTER).unwrap();
        assert_eq!(led.rgb(), 0x00FF00);
        assert_eq!(led.brightness, 128);
    }

    #[test]
    fn test_set_rtc_rejects_malformed_before_mcu_call() {
        let (hal, mock, _dir) = test_hal("rtc-validate");

        assert!(hal.set_rtc_date_time("2016/08/25 16:00:55.11").is_err());
        assert_eq!(mock.lock().unwrap().call_count(), 0);

        hal.set_rtc_date_time("2016-08-25 16:00:55.11").unwrap();
        assert_eq!(hal.rtc_date_time().unwrap(), "2016-08-25 16:00:55.11");
    }

    #[test]
    fn test_input_state_reads_base_692() {
        let (hal, _mock, dir) = test_hal("inputs");
        fs::create_dir_all(dir.join("sys/gpio692")).unwrap();
        fs::write(dir.join("sys/gpio692/value"), "1\n").unwrap();

        assert_eq!(hal.input_state(0).unwrap(), 1);
        assert!(matches!(hal.input_state(8), Err(HalError::Argument(_))));
    }

    #[test]
    fn test_all_input_states_sentinel_fill() {
        let (hal, _mock, dir) = test_hal("input-sweep");
        for (channel, level) in [(692, "1"), (693, "0"), (694, "1")] {
            fs::create_dir_all(dir.join(format!("sys/gpio{}", channel))).unwrap();
            fs::write(
                dir.join(format!("sys/gpio{}/value", channel)),
                format!("{}\n", level),
            )
            .unwrap();
        }
        // gpio695 missing: the sweep stops there.

        let values = hal.all_input_states();
        assert_eq!(&values[..3], &[1, 0, 1]);
        assert_eq!(&values[3..], &[-1; 5]);
    }

    #[test]
    fn test_fpga_version_formatted_as_hex() {
        let (hal, _mock, _dir) = test_hal("fpga");
        assert_eq!(hal.fpga_version().unwrap(), "41000002");
    }

    #[test]
    fn test_power_up_ignition_state() {
        let (hal, mock, _dir) = test_hal("reason");
        mock.lock()
            .unwrap()
            .set_power_on_reason(PowerOnReason(0x0003));

        let reason = hal.power_up_ignition_state().unwrap();
        assert!(reason.ignition_trigger());
        assert!(reason.wiggle_trigger());
        assert!(!reason.watchdog_reset());
    }

    #[test]
    fn test_mcu_failure_surfaces_with_code() {
        let (hal, mock, _dir) = test_hal("failure");
        mock.lock().unwrap().disconnect();

        match hal.mcu_version() {
            Err(HalError::Mcu(e)) => assert_eq!(e.code(), -1),
            other => panic!("expected MCU error, got {:?}", other),
        }
    }

    #[test]
    fn test_can1_j1708_power_enable_round_trip() {
        let (hal, _mock, _dir) = test_hal("can-power");
        assert_eq!(hal.can1_j1708_power_enable().unwrap(), 0);
        hal.set_can1_j1708_power_enable(true).unwrap();
        assert_eq!(hal.can1_j1708_power_enable().unwrap(), 1);
    }

    #[test]
    fn test_os_shutdown_sets_power_ctl_property() {
        let dir = scratch_dir("shutdown");
        let props = Arc::new(MapProperties::new());
        let config = HalConfig {
            sysfs_root: dir.join("sys"),
            script_dir: dir,
            ..Default::default()
        };
        let hal = Hal::from_parts(
            Box::new(MockMcu::new()),
            props.clone(),
            config,
        )
        .unwrap();

        hal.os_shutdown().unwrap();
        assert_eq!(props.get(POWER_CTL_PROPERTY).unwrap(), "shutdown");
    }

    #[test]
    fn test_device_type_via_config_path() {
        let (hal, _mock, dir) = test_hal("dock");
        fs::write(dir.join("dock-state"), "3\n").unwrap();
        assert_eq!(hal.device_type().unwrap(), DeviceType::SmartHub);
    }

    #[test]
    fn test_device_power_off_forwarded() {
        let (hal, mock, _dir) = test_hal("power-off");
        hal.set_device_power_off(5).unwrap();
        assert_eq!(mock.lock().unwrap().power_off_requests(), &[5]);
    }
}
