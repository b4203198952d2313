//! Channel numbering and hardware constants for the OBC5 device family.

/// Analog channel carrying the ignition line voltage.
pub const ADC_ANALOG_IN1: u8 = 0;
/// Analog channel for general-purpose input 1.
pub const ADC_GPIO_IN1: u8 = 1;
/// Analog channel for general-purpose input 2.
pub const ADC_GPIO_IN2: u8 = 2;
/// Analog channel for general-purpose input 3.
pub const ADC_GPIO_IN3: u8 = 3;
/// Analog channel for general-purpose input 4.
pub const ADC_GPIO_IN4: u8 = 4;
/// Analog channel for general-purpose input 5.
pub const ADC_GPIO_IN5: u8 = 5;
/// Analog channel for general-purpose input 6.
pub const ADC_GPIO_IN6: u8 = 6;
/// Analog channel for general-purpose input 7.
pub const ADC_GPIO_IN7: u8 = 7;
/// Analog channel for the main battery input voltage.
pub const ADC_POWER_IN: u8 = 8;
/// Analog channel for the super capacitor voltage.
pub const ADC_POWER_VCAP: u8 = 9;
/// Analog channel for the temperature sensor.
pub const ADC_TEMPERATURE: u8 = 10;
/// Analog channel identifying the attached cable type.
pub const ADC_CABLE_TYPE: u8 = 11;

/// Signal id of the ignition line, same channel as [`ADC_ANALOG_IN1`].
pub const TYPE_IGNITION: u8 = ADC_ANALOG_IN1;

/// Number of analog (ADC/GPI) voltage channels.
pub const ANALOG_CHANNEL_COUNT: usize = 12;

/// Number of digital automotive input pins.
pub const DIGITAL_INPUT_COUNT: usize = 8;

/// Automotive input N is exposed by the kernel as sysfs GPIO `692 + N`.
pub const GPIO_INPUT_BASE: u16 = 692;

/// MCU-mapped GPIO controlling CAN1/J1708 transceiver power.
pub const CAN1_J1708_PWR_ENABLE_GPIO: u16 = 512;

/// Power-on reason bit: ignition line triggered the boot.
pub const POWER_ON_IGNITION_TRIGGER: u16 = 0x0001;
/// Power-on reason bit: wiggle (motion) sense triggered the boot.
pub const POWER_ON_WIGGLE_TRIGGER: u16 = 0x0002;
/// Power-on reason bit: application processor lockup reset.
pub const POWER_ON_ARM_LOCKUP: u16 = 0x0004;
/// Power-on reason bit: watchdog reset.
pub const POWER_ON_WATCHDOG_RESET: u16 = 0x0008;

/// Library API version, `YYYYMMDD.NNN`.
pub const API_VERSION: &str = "20180803.001";
