//! General watch configuration

use super::time::ClockStyle;

/// Compile-time settings of the watch
#[derive(Debug, Clone, Copy)]
pub struct WatchConfig {
    /// Offset of local time from UTC, in seconds
    pub utc_offset: i32,
    /// Format used for the time of day
    pub clock_style: ClockStyle,
    /// Backlight level after boot (0–7)
    pub brightness: u8,
}

pub const CONFIG: WatchConfig = WatchConfig {
    utc_offset: 1 * 3_600,
    clock_style: ClockStyle::TwentyFourHour,
    brightness: 2,
};
