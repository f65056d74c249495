//! Vela engine crate.
//!
//! Renderer API (`gfx`) with wgpu and noop backends, the 2D overlay used by
//! debug text and the UI, and the platform runtime that drives an `App`.

pub mod core;
pub mod device;
pub mod gfx;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod math;
pub mod paint;
pub mod render;
pub mod scene;
pub mod text;
