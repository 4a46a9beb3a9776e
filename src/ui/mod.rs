//! UI definitions module
//!
//! A minimal window/layer toolkit on top of `embedded-graphics` and the watch face
//! built with it.

pub mod fonts;
pub mod layer;
pub mod resources;
pub mod text;
pub mod watchface;
pub mod window;

pub use watchface::{DisplayController, Event};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Layers are accessed while the window is not loaded
    NotLoaded,
    /// The window is loaded a second time
    AlreadyLoaded,
    /// Formatted text does not fit its buffer
    BufferOverflow,
}
