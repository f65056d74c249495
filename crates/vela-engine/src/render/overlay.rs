use std::ops::Range;

use crate::coords::Rect;
use crate::scene::{DrawCmd, DrawList};
use crate::text::FontSystem;

use super::shapes::common::clip_to_scissor;
use super::shapes::rect::{RectInstance, RectRenderer};
use super::shapes::text::{GlyphInstance, TextRenderer};
use super::{RenderCtx, RenderTarget};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum BatchKind {
    Rect,
    Text,
}

/// Consecutive draw items sharing a renderer and clip rect.
#[derive(Debug, Clone, PartialEq)]
struct Batch {
    kind: BatchKind,
    clip: Option<Rect>,
    range: Range<u32>,
}

/// Draws a [`DrawList`] on top of the frame in paint order.
///
/// Rects and text interleave correctly: the list is split into batches at
/// every change of shape kind or clip rect, and all batches are recorded into
/// one load/store render pass.
#[derive(Default)]
pub struct OverlayRenderer {
    rects: RectRenderer,
    text: TextRenderer,

    rect_instances: Vec<RectInstance>,
    glyph_instances: Vec<GlyphInstance>,
    batches: Vec<Batch>,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        fonts: &FontSystem,
    ) {
        if draw_list.is_empty() || !ctx.viewport.is_valid() {
            return;
        }

        self.rect_instances.clear();
        self.glyph_instances.clear();
        self.batches.clear();

        for item in draw_list.iter_in_paint_order() {
            let (kind, start) = match &item.cmd {
                DrawCmd::Rect(cmd) => {
                    let Some(inst) = RectInstance::from_cmd(cmd) else { continue };
                    let start = self.rect_instances.len() as u32;
                    self.rect_instances.push(inst);
                    (BatchKind::Rect, start)
                }
                DrawCmd::Text(cmd) => {
                    let start = self.glyph_instances.len() as u32;
                    self.text.layout(ctx, cmd, fonts, &mut self.glyph_instances);
                    (BatchKind::Text, start)
                }
            };
            let end = match kind {
                BatchKind::Rect => self.rect_instances.len() as u32,
                BatchKind::Text => self.glyph_instances.len() as u32,
            };
            push_batch(&mut self.batches, kind, item.clip_rect, start..end);
        }

        if self.batches.is_empty() {
            return;
        }

        self.rects.prepare(ctx, &self.rect_instances);
        self.text.prepare(ctx, &self.glyph_instances);

        let mut rpass = target.begin_overlay_pass();

        for batch in &self.batches {
            let Some((x, y, w, h)) = clip_to_scissor(batch.clip, ctx.viewport) else {
                continue;
            };
            rpass.set_scissor_rect(x, y, w, h);
            match batch.kind {
                BatchKind::Rect => self.rects.draw(&mut rpass, batch.range.clone()),
                BatchKind::Text => self.text.draw(&mut rpass, batch.range.clone()),
            }
        }
    }
}

/// Extends the last batch when kind and clip match, otherwise starts a new one.
fn push_batch(batches: &mut Vec<Batch>, kind: BatchKind, clip: Option<Rect>, range: Range<u32>) {
    if range.is_empty() {
        return;
    }
    if let Some(last) = batches.last_mut() {
        if last.kind == kind && last.clip == clip && last.range.end == range.start {
            last.range.end = range.end;
            return;
        }
    }
    batches.push(Batch { kind, clip, range });
}
