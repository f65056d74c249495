use crate::coords::Rect;

use super::{DrawCmd, ZIndex};

/// Stable sort key for draw items.
///
/// Ordering: `z` ascending (back-to-front), then insertion order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    pub order: u32,
}

/// A single draw item: sort key + command + clip rect.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
    /// Scissor rect in overlay pixels. `None` = no clipping.
    pub clip_rect: Option<Rect>,
}

/// Recorded overlay stream for a frame.
///
/// `push()` is O(1); paint-order iteration reuses an internal index buffer.
///
/// Use [`push_clip`](Self::push_clip) / [`pop_clip`](Self::pop_clip) to scope
/// commands to a scissor rect. Nested clips are intersected with their parent.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,

    /// Top is the current effective clip, already intersected with all parents.
    clip_stack: Vec<Rect>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items and the clip stack. Keeps allocated capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
        self.sorted_indices.clear();
        self.clip_stack.clear();
    }

    /// Returns items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes a draw command; it inherits the current clip rect.
    #[inline]
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let clip = self.clip_stack.last().copied();
        self.push_clipped(z, cmd, clip);
    }

    fn push_clipped(&mut self, z: ZIndex, cmd: DrawCmd, clip_rect: Option<Rect>) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            key: SortKey { z, order },
            cmd,
            clip_rect,
        });

        self.sorted_dirty = true;
    }

    /// Copies every item of `other` (in its insertion order) into this list.
    ///
    /// Items keep their own clip rects and are lifted by `z_offset`.
    pub fn append(&mut self, other: &DrawList, z_offset: i32) {
        for item in &other.items {
            self.push_clipped(item.key.z.offset(z_offset), item.cmd.clone(), item.clip_rect);
        }
    }

    /// Begins a scissor region, intersected with any parent clip.
    ///
    /// Calls must be balanced with [`pop_clip`](Self::pop_clip).
    #[inline]
    pub fn push_clip(&mut self, rect: Rect) {
        let effective = match self.clip_stack.last() {
            None => rect,
            // No overlap: zero-area rect so the renderer skips those items.
            Some(&parent) => parent.intersect(rect).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0)),
        };
        self.clip_stack.push(effective);
    }

    /// Ends the most recent scissor region.
    #[inline]
    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clip_stack.is_empty(), "pop_clip called without matching push_clip");
        self.clip_stack.pop();
    }

    /// Iterates items in paint order without cloning draw commands.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.sorted_indices.clear();
            self.sorted_indices.extend(0..self.items.len());
            let items = &self.items;
            self.sorted_indices.sort_by_key(|&i| items[i].key);
            self.sorted_dirty = false;
        }

        self.sorted_indices.iter().map(|&i| &self.items[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    fn rect_z(list: &mut DrawList, z: i32, x: f32) {
        list.push_rect(ZIndex(z), Rect::new(x, 0.0, 1.0, 1.0), Color::transparent());
    }

    fn xs(list: &mut DrawList) -> Vec<f32> {
        list.iter_in_paint_order()
            .map(|item| match &item.cmd {
                DrawCmd::Rect(r) => r.rect.origin.x,
                DrawCmd::Text(t) => t.origin.x,
            })
            .collect()
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn paint_order_is_z_then_insertion() {
        let mut list = DrawList::new();
        rect_z(&mut list, 2, 0.0);
        rect_z(&mut list, 1, 1.0);
        rect_z(&mut list, 2, 2.0);
        rect_z(&mut list, 0, 3.0);
        assert_eq!(xs(&mut list), vec![3.0, 1.0, 0.0, 2.0]);
    }

    #[test]
    fn clear_resets_order() {
        let mut list = DrawList::new();
        rect_z(&mut list, 0, 0.0);
        list.clear();
        assert!(list.is_empty());
        rect_z(&mut list, 0, 5.0);
        assert_eq!(list.items()[0].key.order, 0);
    }

    // ── clipping ──────────────────────────────────────────────────────────

    #[test]
    fn nested_clips_intersect() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        list.push_clip(Rect::new(50.0, 50.0, 100.0, 100.0));
        rect_z(&mut list, 0, 0.0);
        list.pop_clip();
        rect_z(&mut list, 0, 1.0);
        list.pop_clip();
        rect_z(&mut list, 0, 2.0);

        let clips: Vec<_> = list.items().iter().map(|i| i.clip_rect).collect();
        assert_eq!(clips, vec![
            Some(Rect::new(50.0, 50.0, 50.0, 50.0)),
            Some(Rect::new(0.0, 0.0, 100.0, 100.0)),
            None,
        ]);
    }

    // ── append ────────────────────────────────────────────────────────────

    #[test]
    fn append_keeps_clip_and_lifts_z() {
        let mut src = DrawList::new();
        src.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        rect_z(&mut src, 3, 7.0);
        src.pop_clip();

        let mut dst = DrawList::new();
        dst.push_clip(Rect::new(0.0, 0.0, 1.0, 1.0));
        dst.append(&src, 100);
        dst.pop_clip();

        let item = &dst.items()[0];
        assert_eq!(item.key.z, ZIndex(103));
        assert_eq!(item.clip_rect, Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }
}
