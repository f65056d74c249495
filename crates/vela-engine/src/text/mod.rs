//! Font storage shared by the debug text overlay, the UI and the text renderer.

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem};
