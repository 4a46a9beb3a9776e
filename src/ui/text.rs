//! Fixed-size text buffers and the formatters filling them

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

use super::Error;
use crate::system::{battery::BatteryChargeState, time::ClockStyle};

/// Capacity of the "HH:MM" buffer
pub const TIME_BUF_LEN: usize = 6;
/// Capacity of the "DOW DD" buffer
pub const DATE_BUF_LEN: usize = 7;
/// Capacity of the "NN%" buffer
pub const BATTERY_BUF_LEN: usize = 16;

/// Text stored inline in a fixed byte array.
///
/// Writes that do not fit fail with [`Error::BufferOverflow`] and leave the
/// previous content untouched.
#[derive(Debug, Clone)]
pub struct TextBuffer<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> Default for TextBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TextBuffer<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
        }
    }

    pub fn as_str(&self) -> &str {
        // Only ever filled from `&str`s cut at their full length
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Replace the content. Return whether it changed.
    pub fn set(&mut self, text: &str) -> Result<bool, Error> {
        if text.len() > N {
            return Err(Error::BufferOverflow);
        }
        if text == self.as_str() {
            return Ok(false);
        }

        self.buf[..text.len()].copy_from_slice(text.as_bytes());
        self.len = text.len();
        Ok(true)
    }

    /// Replace the content with formatted text. Return whether it changed.
    pub fn write_fmt(&mut self, args: core::fmt::Arguments) -> Result<bool, Error> {
        let mut scratch = [0u8; N];
        let text =
            format_no_std::show(&mut scratch, args).map_err(|_| Error::BufferOverflow)?;
        self.set(text)
    }

    /// Empty the buffer. Return whether it held any text.
    pub fn clear(&mut self) -> bool {
        let changed = self.len > 0;
        self.len = 0;
        changed
    }
}

/// Write the time of day as "HH:MM" (`%H:%M`, or `%I:%M` for 12-hour clocks).
pub fn format_time<const N: usize>(
    buf: &mut TextBuffer<N>,
    time: &NaiveDateTime,
    style: ClockStyle,
) -> Result<bool, Error> {
    let hour = match style {
        ClockStyle::TwentyFourHour => time.hour(),
        ClockStyle::TwelveHour => time.hour12().1,
    };
    buf.write_fmt(format_args!("{:02}:{:02}", hour, time.minute()))
}

/// Write the date as abbreviated weekday and day of month, "Mon 05" (`%a %d`).
pub fn format_date<const N: usize>(
    buf: &mut TextBuffer<N>,
    time: &NaiveDateTime,
) -> Result<bool, Error> {
    buf.write_fmt(format_args!(
        "{} {:02}",
        weekday_abbreviation(time.weekday()),
        time.day()
    ))
}

/// Write the battery percentage as "NN%", or nothing while charging.
pub fn format_battery<const N: usize>(
    buf: &mut TextBuffer<N>,
    state: &BatteryChargeState,
) -> Result<bool, Error> {
    if state.is_charging {
        Ok(buf.clear())
    } else {
        buf.write_fmt(format_args!("{}%", state.charge_percent))
    }
}

fn weekday_abbreviation(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn time_str(time: NaiveDateTime, style: ClockStyle) -> String {
        let mut buf = TextBuffer::<TIME_BUF_LEN>::new();
        format_time(&mut buf, &time, style).unwrap();
        buf.as_str().to_string()
    }

    #[test]
    fn twenty_four_hour_time() {
        assert_eq!(time_str(at(2024, 3, 3, 14, 5), ClockStyle::TwentyFourHour), "14:05");
        assert_eq!(time_str(at(2024, 3, 3, 0, 0), ClockStyle::TwentyFourHour), "00:00");
        assert_eq!(time_str(at(2024, 3, 3, 23, 59), ClockStyle::TwentyFourHour), "23:59");
    }

    #[test]
    fn twelve_hour_time() {
        assert_eq!(time_str(at(2024, 3, 3, 14, 5), ClockStyle::TwelveHour), "02:05");
        assert_eq!(time_str(at(2024, 3, 3, 0, 30), ClockStyle::TwelveHour), "12:30");
        assert_eq!(time_str(at(2024, 3, 3, 12, 0), ClockStyle::TwelveHour), "12:00");
        assert_eq!(time_str(at(2024, 3, 3, 9, 41), ClockStyle::TwelveHour), "09:41");
    }

    #[test]
    fn time_is_always_five_characters() {
        for style in [ClockStyle::TwelveHour, ClockStyle::TwentyFourHour] {
            for hour in 0..24 {
                for minute in [0, 7, 59] {
                    let text = time_str(at(2024, 1, 1, hour, minute), style);
                    assert_eq!(text.len(), 5, "{text}");
                    assert_eq!(&text[2..3], ":");
                }
            }
        }
    }

    #[test]
    fn date_is_weekday_and_padded_day() {
        let mut buf = TextBuffer::<DATE_BUF_LEN>::new();

        format_date(&mut buf, &at(2024, 3, 3, 10, 0)).unwrap();
        assert_eq!(buf.as_str(), "Sun 03");

        format_date(&mut buf, &at(2024, 2, 29, 10, 0)).unwrap();
        assert_eq!(buf.as_str(), "Thu 29");

        for day in 1..=31 {
            format_date(&mut buf, &at(2024, 1, day, 0, 0)).unwrap();
            assert_eq!(buf.len(), 6);
        }
    }

    #[test]
    fn battery_percentage() {
        let mut buf = TextBuffer::<BATTERY_BUF_LEN>::new();
        let mut state = BatteryChargeState {
            charge_percent: 73,
            is_charging: false,
            is_plugged: false,
        };

        assert_eq!(format_battery(&mut buf, &state), Ok(true));
        assert_eq!(buf.as_str(), "73%");

        state.charge_percent = 100;
        format_battery(&mut buf, &state).unwrap();
        assert_eq!(buf.as_str(), "100%");

        state.charge_percent = 5;
        format_battery(&mut buf, &state).unwrap();
        assert_eq!(buf.as_str(), "5%");
    }

    #[test]
    fn battery_text_is_empty_while_charging() {
        let mut buf = TextBuffer::<BATTERY_BUF_LEN>::new();
        buf.set("--%").unwrap();

        let state = BatteryChargeState {
            charge_percent: 40,
            is_charging: true,
            is_plugged: true,
        };
        assert_eq!(format_battery(&mut buf, &state), Ok(true));
        assert!(buf.is_empty());
        assert_eq!(format_battery(&mut buf, &state), Ok(false));
    }

    #[test]
    fn set_reports_changes() {
        let mut buf = TextBuffer::<TIME_BUF_LEN>::new();
        assert_eq!(buf.set("00:00"), Ok(true));
        assert_eq!(buf.set("00:00"), Ok(false));
        assert_eq!(buf.set("00:01"), Ok(true));
    }

    #[test]
    fn overflow_keeps_previous_text() {
        let mut buf = TextBuffer::<4>::new();
        buf.set("abc").unwrap();

        assert_eq!(buf.set("abcde"), Err(Error::BufferOverflow));
        assert_eq!(buf.write_fmt(format_args!("{}", 123_456)), Err(Error::BufferOverflow));
        assert_eq!(buf.as_str(), "abc");
    }
}
