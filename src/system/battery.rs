//! Battery state service
//!
//! Conversion formulas based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

/// Snapshot of the battery as reported to the watch face
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryChargeState {
    /// Estimated capacity in percent (0–100)
    pub charge_percent: u8,
    /// Battery is currently being charged
    pub is_charging: bool,
    /// Watch sits on its charger
    pub is_plugged: bool,
}

/// Source of the current battery state
pub trait BatteryService {
    /// Last known battery state, without measuring
    fn peek(&self) -> BatteryChargeState;
}

/// Convert a raw 12-bit SAADC sample into the battery voltage in millivolts.
pub fn millivolts_from_adc(raw: i16) -> Result<u16, Error> {
    match raw {
        0..=4095 => {
            // Keep as 32 bit for the multiplication. The battery sits behind a 1:2 divider
            // and the ADC has a 3.3 V reference: raw * 2 * 1000 / (4096 / 3.3).
            let adc_val = raw as u32;
            Ok((adc_val * 2000 / 1241) as u16)
        }
        _ => Err(Error::InvalidMeasurement),
    }
}

/// Estimate battery capacity from its voltage.
pub fn percent_from_millivolts(voltage: u16) -> u8 {
    // Fixed data points and linear interpolation in between
    (match voltage {
        0..=3449 => 0,
        3450..=3699 => (voltage - 3450) / 5,
        3700..=4199 => 50 + (voltage - 3700) / 10,
        _ => 100,
    }) as u8
}

/// Caches the most recent battery state and detects changes.
#[derive(Debug, Default)]
pub struct BatteryMonitor {
    state: Option<BatteryChargeState>,
}

impl BatteryMonitor {
    pub const fn new() -> Self {
        Self { state: None }
    }

    /// Store a fresh measurement. Return whether it differs from the previous one.
    pub fn update(&mut self, state: BatteryChargeState) -> bool {
        let changed = self.state != Some(state);
        self.state = Some(state);
        changed
    }
}

impl BatteryService for BatteryMonitor {
    fn peek(&self) -> BatteryChargeState {
        self.state.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    InvalidMeasurement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adc_samples_map_to_millivolts() {
        assert_eq!(millivolts_from_adc(0), Ok(0));
        assert_eq!(millivolts_from_adc(2482), Ok(4000));
        assert_eq!(millivolts_from_adc(4095), Ok(6599));
    }

    #[test]
    fn out_of_range_samples_are_rejected() {
        assert_eq!(millivolts_from_adc(-3), Err(Error::InvalidMeasurement));
        assert_eq!(millivolts_from_adc(4096), Err(Error::InvalidMeasurement));
    }

    #[test]
    fn percent_curve() {
        assert_eq!(percent_from_millivolts(3000), 0);
        assert_eq!(percent_from_millivolts(3449), 0);
        assert_eq!(percent_from_millivolts(3450), 0);
        assert_eq!(percent_from_millivolts(3575), 25);
        assert_eq!(percent_from_millivolts(3700), 50);
        assert_eq!(percent_from_millivolts(3930), 73);
        assert_eq!(percent_from_millivolts(4199), 99);
        assert_eq!(percent_from_millivolts(4200), 100);
        assert_eq!(percent_from_millivolts(5000), 100);
    }

    #[test]
    fn monitor_reports_changes_only() {
        let mut monitor = BatteryMonitor::new();
        assert_eq!(monitor.peek(), BatteryChargeState::default());

        let state = BatteryChargeState {
            charge_percent: 73,
            is_charging: false,
            is_plugged: false,
        };
        assert!(monitor.update(state));
        assert!(!monitor.update(state));
        assert_eq!(monitor.peek(), state);

        let charging = BatteryChargeState {
            is_charging: true,
            is_plugged: true,
            ..state
        };
        assert!(monitor.update(charging));
        assert_eq!(monitor.peek(), charging);
    }
}
