//! Parameter validation performed before hardware access.

pub mod error;
pub mod params;

pub use error::{ArgumentError, ValidationResult};
pub use params::{
    check_analog_channel, check_digital_input, check_led_index, check_rgb, check_rtc_date_time,
};
