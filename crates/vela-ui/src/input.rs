use vela_engine::input::MouseState;

/// Mouse buttons held this frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct UiButtons {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl From<&MouseState> for UiButtons {
    fn from(mouse: &MouseState) -> Self {
        Self {
            left: mouse.left,
            middle: mouse.middle,
            right: mouse.right,
        }
    }
}

/// Input snapshot for one UI frame. Positions are backbuffer pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct UiInput {
    pub mouse_x: f32,
    pub mouse_y: f32,
    pub buttons: UiButtons,
    /// Accumulated wheel position in lines.
    pub scroll: f32,
    /// Backbuffer size.
    pub width: u32,
    pub height: u32,
}

impl UiInput {
    pub fn new(mouse: &MouseState, width: u32, height: u32) -> Self {
        Self {
            mouse_x: mouse.x as f32,
            mouse_y: mouse.y as f32,
            buttons: UiButtons::from(mouse),
            scroll: mouse.scroll as f32,
            width,
            height,
        }
    }
}
