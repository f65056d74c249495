/// Keys the runtime binds, plus a few common ones.
///
/// Anything else arrives as `Unknown`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Space,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Unknown,
}

/// Press or release of a key or mouse button.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Vertical wheel motion; positive scrolls up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    /// Notched wheel.
    Lines(f32),
    /// Touchpad.
    Pixels(f32),
}

/// Window input after translation from the platform.
///
/// Positions are physical pixels, the space of the backbuffer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),
    Key { key: Key, state: ButtonState, repeat: bool },
    PointerMoved { x: f32, y: f32 },
    PointerButton { button: MouseButton, state: ButtonState },
    Wheel(WheelDelta),
    PointerLeft,
    Focused(bool),
}

/// Mouse snapshot handed to applications once per tick.
///
/// Coordinates are whole backbuffer pixels; `scroll` is the accumulated wheel
/// position in lines since startup.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct MouseState {
    pub x: i32,
    pub y: i32,
    pub scroll: i32,
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}
