//! Calvin & Hobbes watchface
//!
//! Background image with the time and date centred below the top edge, the battery
//! percentage in the top right corner and a lightning bolt replacing it while the
//! watch charges.

use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::{Rgb565, RgbColor},
    prelude::DrawTarget,
    primitives::Rectangle,
    text::Alignment,
};

use super::{
    fonts::{system_font, FontKey},
    layer::{BitmapLayer, CompositingMode, Layer, TextLayer},
    resources::{Bitmap, ResourceId},
    text::{self, BATTERY_BUF_LEN, DATE_BUF_LEN, TIME_BUF_LEN},
    window::Window,
    Error,
};
use crate::system::{
    battery::{BatteryChargeState, BatteryService},
    time::Clock,
};

const TIME_FRAME: (i32, i32, u32, u32) = (0, 42, 240, 60);
const DATE_FRAME: (i32, i32, u32, u32) = (0, 108, 240, 30);
const CHARGING_FRAME: (i32, i32, u32, u32) = (212, 3, 16, 32);
const BATTERY_FRAME: (i32, i32, u32, u32) = (0, 0, 235, 30);

/// Events delivered to the watch face by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A new minute started
    MinuteTick,
    /// The battery state changed
    BatteryStateChanged(BatteryChargeState),
}

/// Layers of the loaded watch face, in drawing order
struct Layers {
    background: BitmapLayer,
    time: TextLayer<TIME_BUF_LEN>,
    date: TextLayer<DATE_BUF_LEN>,
    charging: BitmapLayer,
    battery: TextLayer<BATTERY_BUF_LEN>,
}

/// Owns the window of the watch face and keeps its content current.
pub struct DisplayController {
    window: Window,
    /// `Some` between load and unload
    layers: Option<Layers>,
}

impl DisplayController {
    /// Create the controller with an unloaded window covering `bounds`.
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            window: Window::new(bounds),
            layers: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.layers.is_some()
    }

    /// Create and position all layers, then show the current battery state and time.
    pub fn on_load<C, B>(&mut self, clock: &C, battery: &B) -> Result<(), Error>
    where
        C: Clock,
        B: BatteryService,
    {
        self.window.load()?;
        let bounds = self.window.bounds();

        let mut background = BitmapLayer::new(bounds);
        background.set_bitmap(Bitmap::with_resource(ResourceId::ImageBackground));

        let mut time = TextLayer::<TIME_BUF_LEN>::new(frame_in(&bounds, TIME_FRAME));
        time.set_background_color(None);
        time.set_text_color(Rgb565::WHITE);
        time.set_text("00:00")?;
        time.set_font(system_font(FontKey::Bitham42Bold));
        time.set_alignment(Alignment::Center);

        let mut date = TextLayer::<DATE_BUF_LEN>::new(frame_in(&bounds, DATE_FRAME));
        date.set_background_color(None);
        date.set_text_color(Rgb565::WHITE);
        date.set_text("MON 00")?;
        date.set_font(system_font(FontKey::Gothic18Bold));
        date.set_alignment(Alignment::Center);

        let mut charging = BitmapLayer::new(frame_in(&bounds, CHARGING_FRAME));
        charging.set_bitmap(Bitmap::with_resource(ResourceId::ImageChargingWhite));
        charging.set_compositing_mode(CompositingMode::Or);

        let mut battery_text =
            TextLayer::<BATTERY_BUF_LEN>::new(frame_in(&bounds, BATTERY_FRAME));
        battery_text.set_background_color(None);
        battery_text.set_text_color(Rgb565::WHITE);
        battery_text.set_text("--%")?;
        battery_text.set_font(system_font(FontKey::Gothic18Bold));
        battery_text.set_alignment(Alignment::Right);

        self.layers = Some(Layers {
            background,
            time,
            date,
            charging,
            battery: battery_text,
        });
        #[cfg(feature = "defmt")]
        defmt::info!("Watchface loaded");

        self.on_battery_change(battery.peek())?;
        self.update_time(clock)
    }

    /// Release all layers, in reverse order of creation.
    pub fn on_unload(&mut self) -> Result<(), Error> {
        let Layers {
            background,
            time,
            date,
            charging,
            battery,
        } = self.layers.take().ok_or(Error::NotLoaded)?;

        drop(charging);
        drop(battery);
        drop(date);
        drop(time);
        drop(background);

        self.window.unload()?;
        #[cfg(feature = "defmt")]
        defmt::info!("Watchface unloaded");
        Ok(())
    }

    /// Show the current time and date.
    pub fn update_time<C: Clock>(&mut self, clock: &C) -> Result<(), Error> {
        let layers = self.layers.as_mut().ok_or(Error::NotLoaded)?;
        let now = clock.now();

        let mut changed =
            text::format_time(layers.time.buffer_mut(), &now, clock.clock_style())?;
        changed |= text::format_date(layers.date.buffer_mut(), &now)?;

        if changed {
            self.window.mark_dirty();
        }
        Ok(())
    }

    /// Show the charging icon while charging, the percentage otherwise.
    pub fn on_battery_change(&mut self, state: BatteryChargeState) -> Result<(), Error> {
        let layers = self.layers.as_mut().ok_or(Error::NotLoaded)?;

        let mut changed = text::format_battery(layers.battery.buffer_mut(), &state)?;
        changed |= layers.charging.set_hidden(!state.is_charging);

        if changed {
            self.window.mark_dirty();
        }
        Ok(())
    }

    pub fn on_minute_tick<C: Clock>(&mut self, clock: &C) -> Result<(), Error> {
        self.update_time(clock)
    }

    /// Dispatch a platform event to its handler.
    pub fn handle_event<C: Clock>(&mut self, event: Event, clock: &C) -> Result<(), Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Handling {}", event);

        match event {
            Event::MinuteTick => self.on_minute_tick(clock),
            Event::BatteryStateChanged(state) => self.on_battery_change(state),
        }
    }

    /// Return whether the face changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        self.window.take_dirty()
    }

    /// Draw the whole face. An unloaded window is drawn empty.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.window.draw_background(target)?;

        if let Some(layers) = &self.layers {
            layers.background.draw(target)?;
            layers.time.draw(target)?;
            layers.date.draw(target)?;
            layers.charging.draw(target)?;
            layers.battery.draw(target)?;
        }
        Ok(())
    }

    pub fn time_text(&self) -> Option<&str> {
        self.layers.as_ref().map(|layers| layers.time.text())
    }

    pub fn date_text(&self) -> Option<&str> {
        self.layers.as_ref().map(|layers| layers.date.text())
    }

    pub fn battery_text(&self) -> Option<&str> {
        self.layers.as_ref().map(|layers| layers.battery.text())
    }

    pub fn is_charging_icon_visible(&self) -> Option<bool> {
        self.layers
            .as_ref()
            .map(|layers| !layers.charging.is_hidden())
    }
}

/// Rectangle relative to the window bounds
fn frame_in(bounds: &Rectangle, (x, y, width, height): (i32, i32, u32, u32)) -> Rectangle {
    Rectangle::new(
        bounds.top_left + Point::new(x, y),
        Size::new(width, height),
    )
}
