//! Color model shared between the overlay renderers, the UI and view clears.
//!
//! Overlay colors are linear premultiplied alpha; view clear colors are
//! packed `0xRRGGBBAA` and converted with [`Color::from_rgba_u32`].

pub mod color;

pub use color::Color;
