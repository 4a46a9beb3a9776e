//! System fonts

use embedded_graphics::mono_font::{ascii::FONT_10X20, MonoFont};
use profont::PROFONT_24_POINT;

/// Keys of the fonts built into the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKey {
    /// Large bold digits for the time of day
    Bitham42Bold,
    /// Small bold text
    Gothic18Bold,
}

/// Look up a system font by its key.
pub fn system_font(key: FontKey) -> &'static MonoFont<'static> {
    match key {
        FontKey::Bitham42Bold => &PROFONT_24_POINT,
        FontKey::Gothic18Bold => &FONT_10X20,
    }
}
