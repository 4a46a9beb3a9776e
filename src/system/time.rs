//! Time keeping module for PineTime
//!
//! The watch has no battery-backed RTC, so wall-clock time is a reference point
//! (a known date and time paired with the uptime at which it was valid) advanced
//! by the uptime elapsed since.

use chrono::{DateTime, Duration, NaiveDateTime, Timelike, Utc};

use super::config::WatchConfig;

/// Clock format used for the time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockStyle {
    /// 01–12
    TwelveHour,
    /// 00–23
    TwentyFourHour,
}

/// Source of local wall-clock time
pub trait Clock {
    /// Current local time
    fn now(&self) -> NaiveDateTime;

    /// Clock format selected on the watch
    fn clock_style(&self) -> ClockStyle;

    /// Whether times are shown in 24-hour format
    fn is_24h_style(&self) -> bool {
        self.clock_style() == ClockStyle::TwentyFourHour
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeReference {
    /// Clock time (UTC)
    time: NaiveDateTime,
    /// Uptime in microseconds at which `time` was valid
    uptime_us: u64,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            time: NaiveDateTime::default(),
            uptime_us: 0,
        }
    }
}

impl TimeReference {
    /// Create new time reference from NaiveDateTime
    pub fn from_datetime(time: NaiveDateTime, uptime_us: u64) -> Self {
        Self { time, uptime_us }
    }

    /// Create new time reference from a UNIX timestamp in seconds
    pub fn from_timestamp(secs: i64, uptime_us: u64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp(secs, 0)
            .map(|utc| Self::from_datetime(utc.naive_utc(), uptime_us))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TimeManager {
    reference: TimeReference,
    /// Offset of local time from UTC in seconds
    utc_offset: i32,
    clock_style: ClockStyle,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init(config: &WatchConfig) -> Self {
        Self {
            reference: TimeReference::default(),
            utc_offset: config.utc_offset,
            clock_style: config.clock_style,
        }
    }

    /// Local time at the given uptime
    pub fn time_at(&self, uptime_us: u64) -> NaiveDateTime {
        let elapsed = uptime_us.saturating_sub(self.reference.uptime_us);
        let offset = Duration::seconds(self.utc_offset.into());

        Duration::microseconds(i64::try_from(elapsed).unwrap_or(i64::MAX))
            .checked_add(&offset)
            .and_then(|delta| self.reference.time.checked_add_signed(delta))
            .unwrap_or(self.reference.time)
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        self.reference = reference;
    }

    pub fn clock_style(&self) -> ClockStyle {
        self.clock_style
    }

    pub fn set_clock_style(&mut self, style: ClockStyle) {
        self.clock_style = style;
    }
}

/// Milliseconds from `now` until the start of the next minute (1..=60_000).
pub fn until_next_minute(now: &NaiveDateTime) -> u64 {
    // Leap seconds are reported as nanosecond values above one second
    let millis = (now.nanosecond() / 1_000_000).min(999) as u64;
    60_000 - (now.second() as u64 * 1_000 + millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 3)
            .unwrap()
            .and_hms_milli_opt(h, m, s, ms)
            .unwrap()
    }

    fn config(utc_offset: i32) -> WatchConfig {
        WatchConfig {
            utc_offset,
            clock_style: ClockStyle::TwelveHour,
            brightness: 0,
        }
    }

    #[test]
    fn time_advances_with_uptime() {
        let mut manager = TimeManager::init(&config(0));
        manager.set_time(TimeReference::from_datetime(at(13, 59, 30, 0), 5_000_000));

        assert_eq!(manager.time_at(5_000_000), at(13, 59, 30, 0));
        assert_eq!(manager.time_at(35_000_000), at(14, 0, 0, 0));
        assert_eq!(manager.time_at(35_250_000), at(14, 0, 0, 250));
    }

    #[test]
    fn utc_offset_is_applied() {
        let mut manager = TimeManager::init(&config(-2 * 3_600));
        manager.set_time(TimeReference::from_datetime(at(1, 30, 0, 0), 0));

        let local = manager.time_at(0);
        assert_eq!(local.date(), NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!((local.hour(), local.minute()), (23, 30));
    }

    #[test]
    fn uptime_before_reference_does_not_go_back() {
        let mut manager = TimeManager::init(&config(0));
        manager.set_time(TimeReference::from_datetime(at(8, 0, 0, 0), 10_000_000));

        assert_eq!(manager.time_at(0), at(8, 0, 0, 0));
    }

    #[test]
    fn reference_from_timestamp() {
        // 2024-03-03T12:00:00Z
        let reference = TimeReference::from_timestamp(1_709_467_200, 0).unwrap();
        assert_eq!(reference, TimeReference::from_datetime(at(12, 0, 0, 0), 0));
    }

    #[test]
    fn clock_style_follows_config() {
        let mut manager = TimeManager::init(&config(0));
        assert_eq!(manager.clock_style(), ClockStyle::TwelveHour);

        manager.set_clock_style(ClockStyle::TwentyFourHour);
        assert_eq!(manager.clock_style(), ClockStyle::TwentyFourHour);
    }

    #[test]
    fn clock_reports_24h_style() {
        struct Fixed(ClockStyle);

        impl Clock for Fixed {
            fn now(&self) -> NaiveDateTime {
                at(0, 0, 0, 0)
            }

            fn clock_style(&self) -> ClockStyle {
                self.0
            }
        }

        assert!(Fixed(ClockStyle::TwentyFourHour).is_24h_style());
        assert!(!Fixed(ClockStyle::TwelveHour).is_24h_style());
    }

    #[test]
    fn next_minute_boundary() {
        assert_eq!(until_next_minute(&at(10, 0, 0, 0)), 60_000);
        assert_eq!(until_next_minute(&at(10, 0, 59, 0)), 1_000);
        assert_eq!(until_next_minute(&at(10, 0, 59, 999)), 1);
        assert_eq!(until_next_minute(&at(10, 0, 12, 500)), 47_500);
    }
}
