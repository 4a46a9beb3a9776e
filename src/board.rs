//! nRF52832 configuration of the PineTime

use embassy_nrf::config::{Config, Debug, HfclkSource, LfclkSource};

/// Chip configuration applied by `embassy_nrf::init`.
pub fn system_config() -> Config {
    // `Config` is `non_exhaustive`, start from the defaults
    let mut config = Config::default();

    // The PineTime carries both a 32 MHz and a 32.768 kHz crystal
    config.hfclk_source = HfclkSource::ExternalXtal;
    config.lfclk_source = LfclkSource::ExternalXtal;

    // DC/DC regulator massively reduces runtime current consumption
    config.dcdc.reg1 = true;

    // Keep the SWD port usable for probe-rs and defmt-rtt
    config.debug = Debug::Allowed;

    config
}
