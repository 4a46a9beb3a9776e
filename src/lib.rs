//! Calvin & Hobbes watch face for the PineTime.
//!
//! The library holds everything that does not touch the nRF52 peripherals: the
//! display controller, the small layer toolkit it is built on, and the clock and
//! battery services it reads from. The firmware binary (`firmware` feature) wires
//! these to the hardware.

#![cfg_attr(not(test), no_std)]

pub mod system;
pub mod ui;
