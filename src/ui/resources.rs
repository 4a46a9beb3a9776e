//! Image resources
//!
//! Images are stored as raw 1 bit per pixel data, rows padded to whole bytes, most
//! significant bit first.

use embedded_graphics::geometry::Size;

/// Identifiers of the images built into the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceId {
    /// Full screen background
    ImageBackground,
    /// Lightning bolt shown while charging
    ImageChargingWhite,
}

static BACKGROUND: &[u8] = include_bytes!("../../resources/background.raw");
static CHARGING_WHITE: &[u8] = include_bytes!("../../resources/charging_white.raw");

/// Monochrome image
#[derive(Debug, Clone, Copy)]
pub struct Bitmap {
    data: &'static [u8],
    width: u32,
}

impl Bitmap {
    /// Load a built-in image.
    pub fn with_resource(id: ResourceId) -> Self {
        match id {
            ResourceId::ImageBackground => Self::new(BACKGROUND, 240),
            ResourceId::ImageChargingWhite => Self::new(CHARGING_WHITE, 16),
        }
    }

    pub const fn new(data: &'static [u8], width: u32) -> Self {
        Self { data, width }
    }

    pub fn size(&self) -> Size {
        let height = match self.bytes_per_row() {
            0 => 0,
            row => self.data.len() / row,
        };
        Size::new(self.width, height as u32)
    }

    /// Whether the pixel at (`x`, `y`) is set. Out of bounds pixels are unset.
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        if x >= self.width {
            return false;
        }
        let index = y as usize * self.bytes_per_row() + x as usize / 8;
        self.data
            .get(index)
            .map_or(false, |byte| byte & (0x80 >> (x % 8)) != 0)
    }

    fn bytes_per_row(&self) -> usize {
        (self.width as usize + 7) / 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_images_have_expected_size() {
        assert_eq!(
            Bitmap::with_resource(ResourceId::ImageBackground).size(),
            Size::new(240, 240)
        );
        assert_eq!(
            Bitmap::with_resource(ResourceId::ImageChargingWhite).size(),
            Size::new(16, 32)
        );
    }

    #[test]
    fn pixels_are_msb_first() {
        static DATA: [u8; 4] = [0b1000_0001, 0b0100_0000, 0b0000_0000, 0b1000_0000];
        let bitmap = Bitmap::new(&DATA, 10);

        assert_eq!(bitmap.size(), Size::new(10, 2));
        assert!(bitmap.is_set(0, 0));
        assert!(bitmap.is_set(7, 0));
        assert!(bitmap.is_set(9, 0));
        assert!(!bitmap.is_set(8, 0));
        assert!(bitmap.is_set(8, 1));
        assert!(!bitmap.is_set(10, 0));
        assert!(!bitmap.is_set(0, 2));
    }
}
