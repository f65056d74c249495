use vela_engine::coords::Vec2;
use vela_engine::paint::Color;

/// Sizes and colors used by every widget.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Style {
    /// Text size in pixels.
    pub font_size: f32,
    pub window_padding: Vec2,
    pub frame_padding: Vec2,
    /// Vertical gap between items.
    pub item_spacing: f32,
    /// Gap between a widget and its label.
    pub inner_spacing: f32,
    pub min_window_width: f32,

    pub text: Color,
    pub window_bg: Color,
    pub popup_bg: Color,
    pub border: Color,
    pub title_bg: Color,
    pub title_bg_active: Color,
    pub frame_bg: Color,
    pub frame_bg_hovered: Color,
    pub check_mark: Color,
    pub button: Color,
    pub button_hovered: Color,
    pub header: Color,
    pub header_hovered: Color,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            font_size: 15.0,
            window_padding: Vec2::new(8.0, 8.0),
            frame_padding: Vec2::new(4.0, 3.0),
            item_spacing: 4.0,
            inner_spacing: 4.0,
            min_window_width: 120.0,

            text: Color::from_rgba_u32(0xffffffff),
            window_bg: Color::from_rgba_u32(0x0f0f0ff0),
            popup_bg: Color::from_rgba_u32(0x141414f0),
            border: Color::from_rgba_u32(0x6e6e8080),
            title_bg: Color::from_rgba_u32(0x0a0a0aff),
            title_bg_active: Color::from_rgba_u32(0x294a7aff),
            frame_bg: Color::from_rgba_u32(0x294a7a8a),
            frame_bg_hovered: Color::from_rgba_u32(0x4296fa66),
            check_mark: Color::from_rgba_u32(0x4296faff),
            button: Color::from_rgba_u32(0x4296fa66),
            button_hovered: Color::from_rgba_u32(0x4296faff),
            header: Color::from_rgba_u32(0x4296fa4f),
            header_hovered: Color::from_rgba_u32(0x4296facc),
        }
    }
}
