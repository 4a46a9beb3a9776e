#![no_std]
#![no_main]

mod board;
mod peripherals;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use core::cell::RefCell;
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    peripherals::SPI2,
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim,
};
use embassy_sync::{
    blocking_mutex::{raw::ThreadModeRawMutex, Mutex},
    channel::Channel,
};
use embassy_time::{Delay, Duration, Instant, Timer};

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use calvin_watchface::{
    system::{
        battery::{BatteryChargeState, BatteryMonitor, BatteryService},
        config::CONFIG,
        time::{self, Clock, ClockStyle, TimeManager, TimeReference},
    },
    ui::{DisplayController, Event},
};
use peripherals::{backlight::Backlight, battery::Battery, display::Display};

// Others
use chrono::NaiveDateTime;

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

// Communication channels
static EVENTS: Channel<ThreadModeRawMutex, Event, 4> = Channel::new();
static BATTERY: Mutex<ThreadModeRawMutex, RefCell<BatteryMonitor>> =
    Mutex::new(RefCell::new(BatteryMonitor::new()));

/// Wall clock backed by the RTC driven uptime
#[derive(Clone, Copy)]
struct SystemClock {
    manager: TimeManager,
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        self.manager.time_at(Instant::now().as_micros())
    }

    fn clock_style(&self) -> ClockStyle {
        self.manager.clock_style()
    }
}

/// Last battery state measured by `update_battery_status`
struct SharedBattery;

impl BatteryService for SharedBattery {
    fn peek(&self) -> BatteryChargeState {
        BATTERY.lock(|monitor| monitor.borrow().peek())
    }
}

/// Store a battery measurement. Return whether it differs from the last one.
fn store_battery_state(state: BatteryChargeState) -> bool {
    BATTERY.lock(|monitor| monitor.borrow_mut().update(state))
}

/// Send a tick at the start of every minute.
#[embassy_executor::task(pool_size = 1)]
async fn tick_minutes(clock: SystemClock) {
    loop {
        let wait = time::until_next_minute(&clock.now());
        Timer::after(Duration::from_millis(wait)).await;

        EVENTS.send(Event::MinuteTick).await;
    }
}

/// Fetch the battery status from the hardware.
#[embassy_executor::task(pool_size = 1)]
async fn update_battery_status(mut battery: Battery<'static>) {
    loop {
        match battery.state().await {
            Ok(state) => {
                if store_battery_state(state) {
                    // Battery status changed
                    defmt::info!(
                        "Battery status: {}% ({})",
                        state.charge_percent,
                        if state.is_charging {
                            "charging"
                        } else {
                            "discharging"
                        }
                    );
                    EVENTS.send(Event::BatteryStateChanged(state)).await;
                }
            }
            Err(e) => defmt::warn!("Battery measurement failed: {}", e),
        }

        // Re-schedule the timer interrupt in 1s
        Timer::after(Duration::from_secs(1)).await;
    }
}

/// Own the watch face and the LCD, handle events one at a time.
#[embassy_executor::task(pool_size = 1)]
async fn run_watchface(
    mut display: Display<'static, SPI2>,
    backlight: Backlight<'static>,
    clock: SystemClock,
) {
    let mut face = DisplayController::new(display.bounds());
    if let Err(e) = face.on_load(&clock, &SharedBattery) {
        defmt::warn!("Loading watchface failed: {}", e);
    }
    defmt::info!("Backlight at level {}", backlight.get_brightness());

    loop {
        if face.take_dirty() {
            if let Err(e) = display.render(&face) {
                defmt::warn!("Rendering failed: {}", e);
            }
        }

        let event = EVENTS.receive().await;
        if let Err(e) = face.handle_event(event, &clock) {
            defmt::warn!("Handling {} failed: {}", event, e);
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut p = embassy_nrf::init(board::system_config());
    defmt::info!("Initializing");

    // Initialize clock from the build time
    let mut manager = TimeManager::init(&CONFIG);
    match TimeReference::from_timestamp(UTC_EPOCH, Instant::now().as_micros()) {
        Some(reference) => manager.set_time(reference),
        None => defmt::warn!("Invalid build timestamp {}", UTC_EPOCH),
    }
    let clock = SystemClock { manager };

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(&mut p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initialize battery and take a first measurement for the watch face to peek at
    let mut battery = Battery::init(
        saadc,
        Input::new(p.P0_12, Pull::None),
        Input::new(p.P0_19, Pull::None),
    );
    match battery.state().await {
        Ok(state) => {
            store_battery_state(state);
        }
        Err(e) => defmt::warn!("Battery measurement failed: {}", e),
    }

    // Initialize Backlight
    let backlight = unwrap!(Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
        CONFIG.brightness,
    ));

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
        &mut Delay,
    ));

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(run_watchface(display, backlight, clock)));
    unwrap!(spawner.spawn(tick_minutes(clock)));
    unwrap!(spawner.spawn(update_battery_status(battery)));
}
