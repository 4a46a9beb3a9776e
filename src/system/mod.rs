//! Services the watch face reads from

pub mod battery;
pub mod config;
pub mod time;
