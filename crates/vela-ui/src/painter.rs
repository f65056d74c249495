use vela_engine::coords::{Rect, Vec2};
use vela_engine::paint::Color;
use vela_engine::scene::{DrawList, ZIndex};
use vela_engine::text::FontId;

/// Records UI geometry into a `DrawList`.
///
/// Every call takes the next z value inside the current layer, so paint order
/// is call order. Layers keep windows and popups apart.
pub(crate) struct Painter {
    list: DrawList,
    layer: i32,
    z: i32,
}

impl Painter {
    pub fn new() -> Self {
        Self { list: DrawList::new(), layer: 0, z: 0 }
    }

    pub fn clear(&mut self) {
        self.list.clear();
        self.z = 0;
    }

    pub fn set_layer(&mut self, layer: i32) {
        self.layer = layer;
        self.z = 0;
    }

    pub fn list(&self) -> &DrawList {
        &self.list
    }

    // ── drawing ───────────────────────────────────────────────────────────

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let z = self.next_z();
        self.list.push_rect(z, rect, color);
    }

    pub fn outline(&mut self, rect: Rect, width: f32, color: Color) {
        let z = self.next_z();
        self.list.push_rect_outline(z, rect, width, color);
    }

    /// Single-line text with its top-left at `origin`. Skipped without a font.
    pub fn text(&mut self, text: &str, font: Option<FontId>, size: f32, color: Color, origin: Vec2) {
        let Some(font) = font else { return };
        if text.is_empty() {
            return;
        }
        let z = self.next_z();
        self.list.push_text(z, text, font, size, color, origin);
    }

    // ── clipping ──────────────────────────────────────────────────────────

    pub fn push_clip(&mut self, rect: Rect) {
        self.list.push_clip(rect);
    }

    pub fn pop_clip(&mut self) {
        self.list.pop_clip();
    }

    #[inline]
    fn next_z(&mut self) -> ZIndex {
        let z = ZIndex::new(self.layer + self.z);
        self.z += 1;
        z
    }
}
