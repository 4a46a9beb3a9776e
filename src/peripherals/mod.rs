//! PineTime peripherals used by the watch face

pub(super) mod backlight;
pub(super) mod battery;
pub(super) mod display;
