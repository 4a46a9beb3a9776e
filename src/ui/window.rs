//! Root window

use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};

use super::Error;

/// Full screen window holding the layers of a watch face
pub struct Window {
    frame: Rectangle,
    background_color: Rgb565,
    loaded: bool,
    /// Content changed since the last redraw
    dirty: bool,
}

impl Window {
    pub fn new(frame: Rectangle) -> Self {
        Self {
            frame,
            background_color: Rgb565::BLACK,
            loaded: false,
            dirty: true,
        }
    }

    /// Bounds available to the layers
    pub fn bounds(&self) -> Rectangle {
        self.frame
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Mark the window as loaded.
    pub(super) fn load(&mut self) -> Result<(), Error> {
        if self.loaded {
            return Err(Error::AlreadyLoaded);
        }
        self.loaded = true;
        self.dirty = true;
        Ok(())
    }

    /// Mark the window as unloaded.
    pub(super) fn unload(&mut self) -> Result<(), Error> {
        if !self.loaded {
            return Err(Error::NotLoaded);
        }
        self.loaded = false;
        self.dirty = true;
        Ok(())
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Return whether the window needs a redraw and reset the flag.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    /// Fill the window with its background colour.
    pub fn draw_background<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        target.fill_solid(&self.frame, self.background_color)
    }
}
