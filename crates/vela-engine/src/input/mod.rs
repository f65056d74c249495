//! Input subsystem.
//!
//! Public types do not expose winit; the runtime translates platform events
//! with [`translate_window_event`].

mod frame;
mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use platform::translate_window_event;
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, Modifiers, MouseButton, MouseState, WheelDelta};
