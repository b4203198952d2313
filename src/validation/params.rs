//! Range and format checks applied before any MCU call.

use crate::core::constants::{ANALOG_CHANNEL_COUNT, DIGITAL_INPUT_COUNT};
use crate::validation::error::{ArgumentError, ValidationResult};

/// LED position must be 0 (right), 1 (center) or 2 (left).
pub fn check_led_index(led: u8) -> ValidationResult {
    if led > 2 {
        return Err(ArgumentError::new("led", led, "0, 1 or 2"));
    }
    Ok(())
}

/// Packed color word must fit in 24 bits.
pub fn check_rgb(rgb: u32) -> ValidationResult {
    if rgb > 0xFF_FFFF {
        return Err(ArgumentError::new(
            "rgb",
            format!("0x{:X}", rgb),
            "0x000000..=0xFFFFFF",
        ));
    }
    Ok(())
}

/// Analog (ADC/GPI) channel must be one of the 12 defined channels.
pub fn check_analog_channel(channel: u8) -> ValidationResult {
    if usize::from(channel) >= ANALOG_CHANNEL_COUNT {
        return Err(ArgumentError::new("channel", channel, "0..=11"));
    }
    Ok(())
}

/// Digital automotive input must be one of the 8 defined pins.
pub fn check_digital_input(channel: u8) -> ValidationResult {
    if usize::from(channel) >= DIGITAL_INPUT_COUNT {
        return Err(ArgumentError::new("channel", channel, "0..=7"));
    }
    Ok(())
}

/// Validate an RTC date-time string against the exact MCU format
/// `YYYY-MM-DD HH:MM:SS.CC`, e.g. `2016-08-25 16:00:55.11`.
///
/// Every deviation is rejected here so a malformed string never reaches the
/// MCU transport.
pub fn check_rtc_date_time(date_time: &str) -> ValidationResult {
    let err = || {
        ArgumentError::new(
            "date_time",
            format!("{:?}", date_time),
            "YYYY-MM-DD HH:MM:SS.CC",
        )
    };

    let bytes = date_time.as_bytes();
    if bytes.len() != 22 {
        return Err(err());
    }

    // Literal separators at fixed positions, digits everywhere else.
    for (i, &b) in bytes.iter().enumerate() {
        let ok = match i {
            4 | 7 => b == b'-',
            10 => b == b' ',
            13 | 16 => b == b':',
            19 => b == b'.',
            _ => b.is_ascii_digit(),
        };
        if !ok {
            return Err(err());
        }
    }

    let field = |range: std::ops::Range<usize>| -> u32 {
        date_time[range].parse().unwrap_or(0)
    };

    let year = field(0..4);
    let month = field(5..7);
    let day = field(8..10);
    let hour = field(11..13);
    let minute = field(14..16);
    let second = field(17..19);
    // Centiseconds are two digits by construction, any value 00-99 is fine.

    if !(1..=12).contains(&month) {
        return Err(err());
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(err());
    }
    if hour > 23 || minute > 59 || second > 59 {
        return Err(err());
    }

    Ok(())
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}
