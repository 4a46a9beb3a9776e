//! Display control module for PineTime

use display_interface_spi::SPIInterface;
use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_18, P0_25, P0_26},
    spim::{self, Spim},
};
use embassy_time::Delay;
use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};
use mipidsi::{models::ST7789, Builder, Orientation};

use calvin_watchface::ui::DisplayController;

const LCD_W: u16 = 240;
const LCD_H: u16 = 240;

type Lcd<'a, SPI> = mipidsi::Display<
    SPIInterface<Spim<'a, SPI>, Output<'a, P0_18>, Output<'a, P0_25>>,
    ST7789,
    Output<'a, P0_26>,
>;

/// ST7789 LCD driven over SPI
pub struct Display<'a, SPI>
where
    SPI: spim::Instance,
{
    lcd: Lcd<'a, SPI>,
}

impl<'a, SPI> Display<'a, SPI>
where
    SPI: spim::Instance,
{
    /// Initialize the display and clear it to black
    pub fn init(
        spim: Spim<'a, SPI>,
        cs: Output<'a, P0_25>,
        dc: Output<'a, P0_18>,
        rst: Output<'a, P0_26>,
        delay: &mut Delay,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc, cs))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(delay, Some(rst))
            .map_err(|_| Error::Init)?;

        let mut display = Self { lcd };
        display.clear(Rgb565::BLACK)?;
        Ok(display)
    }

    /// Screen area
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(LCD_W as u32, LCD_H as u32))
    }

    /// Clear the display
    pub fn clear(&mut self, color: Rgb565) -> Result<(), Error> {
        self.lcd.clear(color).map_err(|_| Error::Interface)
    }

    /// Draw the watch face
    pub fn render(&mut self, face: &DisplayController) -> Result<(), Error> {
        face.draw(&mut self.lcd).map_err(|_| Error::Interface)
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    /// Display controller did not respond to the init sequence
    Init,
    /// SPI transfer failed
    Interface,
}
