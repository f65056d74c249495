use crate::math::{Mat4, IDENTITY};

use super::ClearFlags;

/// View index; views are drawn in ascending order.
pub type ViewId = u16;

/// Clear performed at the start of a view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewClear {
    pub flags: ClearFlags,
    /// Packed `0xRRGGBBAA`.
    pub rgba: u32,
    pub depth: f32,
    pub stencil: u8,
}

impl Default for ViewClear {
    fn default() -> Self {
        Self {
            flags: ClearFlags::empty(),
            rgba: 0x0000_00ff,
            depth: 1.0,
            stencil: 0,
        }
    }
}

/// Viewport of a view in backbuffer pixels. A zero size covers the whole backbuffer.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ViewRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl ViewRect {
    /// Resolves the rect against the backbuffer, clamped to it.
    pub fn resolve(self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        if self.width == 0 || self.height == 0 {
            return (0, 0, width, height);
        }
        let x = (self.x as u32).min(width);
        let y = (self.y as u32).min(height);
        let w = (self.width as u32).min(width - x);
        let h = (self.height as u32).min(height - y);
        (x, y, w, h)
    }
}

/// Per-view state set with `Gfx::set_view_*`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct View {
    pub clear: ViewClear,
    pub rect: ViewRect,
    pub view: Mat4,
    pub proj: Mat4,
}

impl Default for View {
    fn default() -> Self {
        Self {
            clear: ViewClear::default(),
            rect: ViewRect::default(),
            view: IDENTITY,
            proj: IDENTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rect_covers_backbuffer() {
        assert_eq!(ViewRect::default().resolve(640, 480), (0, 0, 640, 480));
    }

    #[test]
    fn rect_is_clamped_to_backbuffer() {
        let r = ViewRect { x: 600, y: 10, width: 100, height: 100 };
        assert_eq!(r.resolve(640, 480), (600, 10, 40, 100));
    }
}
