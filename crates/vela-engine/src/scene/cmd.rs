use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::text::FontId;

use super::{DrawList, ZIndex};

/// Overlay draw command. `render::overlay` has one batcher per variant.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
    Text(TextCmd),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub color: Color,
}

/// One line of text. Nothing wraps: debug text and widget labels are laid
/// out by their producers.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    pub font: FontId,
    /// Pixel size passed to the rasterizer.
    pub size: f32,
    pub color: Color,
    /// Top-left corner of the line box.
    pub origin: Vec2,
}

impl DrawList {
    /// Records a solid rectangle.
    #[inline]
    pub fn push_rect(&mut self, z: ZIndex, rect: Rect, color: Color) {
        self.push(z, DrawCmd::Rect(RectCmd { rect, color }));
    }

    /// Records a `width` pixel border drawn inside `rect` as four bars.
    pub fn push_rect_outline(&mut self, z: ZIndex, rect: Rect, width: f32, color: Color) {
        let r = rect.normalized();
        let w = width.min(r.size.x * 0.5).min(r.size.y * 0.5).max(0.0);
        if w <= 0.0 {
            return;
        }
        let (x, y, rw, rh) = (r.origin.x, r.origin.y, r.size.x, r.size.y);
        let side = rh - 2.0 * w;
        self.push_rect(z, Rect::new(x, y, rw, w), color);
        self.push_rect(z, Rect::new(x, y + rh - w, rw, w), color);
        self.push_rect(z, Rect::new(x, y + w, w, side), color);
        self.push_rect(z, Rect::new(x + rw - w, y + w, w, side), color);
    }

    /// Records a line of text. Empty or fully transparent text is dropped.
    pub fn push_text(
        &mut self,
        z: ZIndex,
        text: impl Into<String>,
        font: FontId,
        size: f32,
        color: Color,
        origin: Vec2,
    ) {
        let text = text.into();
        if text.is_empty() || color.a <= 0.0 {
            return;
        }
        self.push(z, DrawCmd::Text(TextCmd { text, font, size, color, origin }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_is_four_bars_inside_rect() {
        let mut list = DrawList::new();
        list.push_rect_outline(ZIndex(0), Rect::new(10.0, 10.0, 20.0, 8.0), 2.0, Color::from_rgba_u32(0xffff_ffff));
        let rects: Vec<Rect> = list
            .items()
            .iter()
            .map(|i| match &i.cmd {
                DrawCmd::Rect(r) => r.rect,
                DrawCmd::Text(_) => unreachable!(),
            })
            .collect();
        assert_eq!(rects, vec![
            Rect::new(10.0, 10.0, 20.0, 2.0),
            Rect::new(10.0, 16.0, 20.0, 2.0),
            Rect::new(10.0, 12.0, 2.0, 4.0),
            Rect::new(28.0, 12.0, 2.0, 4.0),
        ]);
    }

    #[test]
    fn invisible_text_is_dropped() {
        let mut list = DrawList::new();
        let font = FontId(0);
        list.push_text(ZIndex(0), "", font, 12.0, Color::from_rgba_u32(0xffff_ffff), Vec2::zero());
        list.push_text(ZIndex(0), "x", font, 12.0, Color::transparent(), Vec2::zero());
        assert!(list.is_empty());
        list.push_text(ZIndex(0), "x", font, 12.0, Color::from_rgba_u32(0xffff_ffff), Vec2::zero());
        assert_eq!(list.len(), 1);
    }
}
