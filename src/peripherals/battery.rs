//! Battery status check
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{
    gpio::Input,
    peripherals::{P0_12, P0_19},
    saadc::Saadc,
};

use calvin_watchface::system::battery::{self, BatteryChargeState};

/// Battery API
pub struct Battery<'a> {
    /// ADC instance for battery voltage measurement (pin P0.31)
    adc: Saadc<'a, 1>,
    /// Charge indication pin:
    /// high = battery, low = charging
    pin_charge_indication: Input<'a, P0_12>,
    /// Power presence pin:
    /// high = battery, low = on charger
    pin_power_presence: Input<'a, P0_19>,
}

impl<'a> Battery<'a> {
    /// Configure battery settings on boot
    pub fn init(
        adc: Saadc<'a, 1>,
        charge_pin: Input<'a, P0_12>,
        power_pin: Input<'a, P0_19>,
    ) -> Self {
        Self {
            adc,
            pin_charge_indication: charge_pin,
            pin_power_presence: power_pin,
        }
    }

    /// Measure the current battery state.
    pub async fn state(&mut self) -> Result<BatteryChargeState, battery::Error> {
        let voltage = self.get_voltage().await?;

        Ok(BatteryChargeState {
            charge_percent: battery::percent_from_millivolts(voltage),
            is_charging: self.pin_charge_indication.is_low(),
            is_plugged: self.pin_power_presence.is_low(),
        })
    }

    /// Battery voltage in millivolts
    async fn get_voltage(&mut self) -> Result<u16, battery::Error> {
        let mut buf = [0; 1];
        self.adc.sample(&mut buf).await;
        battery::millivolts_from_adc(buf[0])
    }
}
