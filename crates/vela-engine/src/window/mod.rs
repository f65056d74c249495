//! Window and platform loop.
//!
//! Owns the winit event loop and the window, and drives an `AppHost` from it.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
