use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use vela_engine::coords::{Rect, Vec2};
use vela_engine::gfx::Gfx;
use vela_engine::scene::ZIndex;
use vela_engine::text::{FontId, FontSystem};

use crate::input::{UiButtons, UiInput};
use crate::metrics::TextMetrics;
use crate::painter::Painter;
use crate::style::Style;

/// z range reserved per window, back to front.
const LAYER_STRIDE: i32 = 1 << 16;
/// Popups draw above every window and below debug text.
const POPUP_LAYER: i32 = ZIndex::DEBUG_TEXT.0 - LAYER_STRIDE;
/// Part of a window that stays on screen when it is dragged away.
const KEEP_VISIBLE: f32 = 32.0;

/// When a `set_next_window_*` value is applied.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Cond {
    /// Every frame.
    Always,
    /// Only on the frame the window is first created.
    FirstUseEver,
}

/// Text shown for a label: everything before `##`.
///
/// The full label, hidden part included, identifies the widget.
pub fn visible_label(label: &str) -> &str {
    label.split_once("##").map_or(label, |(shown, _)| shown)
}

fn widget_id(seed: u64, label: &str) -> u64 {
    let mut h = DefaultHasher::new();
    seed.hash(&mut h);
    label.hash(&mut h);
    h.finish()
}

#[derive(Debug)]
struct WindowState {
    pos: Vec2,
    size: Vec2,
    /// Size follows the content measured on the previous frame.
    auto_size: bool,
    content: Vec2,
    /// Submitted during the current (or, before `begin_frame`, last) frame.
    seen: bool,
}

impl WindowState {
    fn rect(&self) -> Rect {
        Rect::from_origin_size(self.pos, self.size)
    }
}

/// Layout cursor of the window between `begin` and `end`.
#[derive(Debug, Copy, Clone)]
struct WindowFrame {
    id: u64,
    rect: Rect,
    cursor: Vec2,
    /// Bottom-right extent of the items so far.
    max: Vec2,
}

/// Immediate-mode UI context.
///
/// Each frame: [`begin_frame`](Self::begin_frame), any number of
/// `begin`/widgets/`end` blocks, then [`end_frame`](Self::end_frame), which
/// hands the recorded geometry to the renderer overlay. Window positions and
/// sizes persist across frames, keyed by title.
pub struct Ui {
    font: Option<FontId>,
    style: Style,
    metrics: TextMetrics,

    input: UiInput,
    prev_buttons: UiButtons,
    /// Wheel position of the previous frame; `None` before the first one.
    last_scroll: Option<f32>,
    /// Wheel lines moved since the previous frame, positive up.
    wheel: f32,

    painter: Painter,
    popup: Painter,

    windows: HashMap<u64, WindowState>,
    /// Back to front.
    order: Vec<u64>,
    current: Option<WindowFrame>,
    next_pos: Option<(Vec2, Cond)>,
    next_size: Option<(Vec2, Cond)>,

    hovered_window: Option<u64>,
    /// Window being dragged and the grab offset from its origin.
    drag: Option<(u64, Vec2)>,

    open_combo: Option<u64>,
    combo_toggled: bool,
    popup_rect: Option<Rect>,
    popup_rect_next: Option<Rect>,

    last_item: Rect,
    in_frame: bool,
}

impl Ui {
    /// Creates a context. Without a font, widgets lay out and react but no text is drawn.
    pub fn new(font: Option<FontId>) -> Self {
        let style = Style::default();
        log::debug!("ui context created (font: {font:?})");
        Self {
            font,
            metrics: TextMetrics::estimated(style.font_size),
            style,
            input: UiInput::default(),
            prev_buttons: UiButtons::default(),
            last_scroll: None,
            wheel: 0.0,
            painter: Painter::new(),
            popup: Painter::new(),
            windows: HashMap::new(),
            order: Vec::new(),
            current: None,
            next_pos: None,
            next_size: None,
            hovered_window: None,
            drag: None,
            open_combo: None,
            combo_toggled: false,
            popup_rect: None,
            popup_rect_next: None,
            last_item: Rect::default(),
            in_frame: false,
        }
    }

    pub fn font(&self) -> Option<FontId> {
        self.font
    }

    pub fn set_font(&mut self, font: Option<FontId>) {
        self.font = font;
        if font.is_none() {
            self.metrics = TextMetrics::estimated(self.style.font_size);
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    /// Rect of the most recent widget.
    pub fn last_item_rect(&self) -> Rect {
        self.last_item
    }

    /// Current rect of the window titled `title`.
    pub fn window_rect(&self, title: &str) -> Option<Rect> {
        self.windows.get(&widget_id(0, title)).map(WindowState::rect)
    }

    pub fn is_popup_open(&self) -> bool {
        self.open_combo.is_some()
    }

    /// True when the pointer is over a window or popup.
    pub fn wants_mouse(&self) -> bool {
        self.hovered_window.is_some() || self.popup_blocks(self.mouse()) || self.drag.is_some()
    }

    // ── frame ─────────────────────────────────────────────────────────────

    pub fn begin_frame(&mut self, input: UiInput, fonts: &FontSystem) {
        if self.in_frame {
            log::warn!("ui: begin_frame without end_frame");
        }
        self.in_frame = true;

        if let Some(font) = self.font {
            if !self.metrics.is_for(font, self.style.font_size) {
                self.metrics = TextMetrics::from_font(fonts, font, self.style.font_size);
            }
        }

        self.prev_buttons = self.input.buttons;
        self.wheel = self.last_scroll.map_or(0.0, |last| input.scroll - last);
        self.last_scroll = Some(input.scroll);
        self.input = input;
        self.painter.clear();
        self.popup.clear();
        self.popup_rect = self.popup_rect_next.take();
        self.combo_toggled = false;
        self.current = None;

        let mouse = self.mouse();
        if let Some((id, grab)) = self.drag {
            match self.windows.get_mut(&id) {
                Some(window) if self.input.buttons.left => window.pos = mouse - grab,
                _ => self.drag = None,
            }
        }

        self.hovered_window = self.order.iter().rev().copied().find(|id| {
            self.windows
                .get(id)
                .is_some_and(|w| w.seen && w.rect().contains(mouse))
        });
        for window in self.windows.values_mut() {
            window.seen = false;
        }
    }

    /// Closes the frame and queues its geometry on the renderer overlay.
    pub fn end_frame(&mut self, gfx: &mut Gfx) {
        if self.current.is_some() {
            log::warn!("ui: end_frame with an open window");
            self.end();
        }

        let mouse = self.mouse();
        if self.pressed()
            && self.open_combo.is_some()
            && !self.combo_toggled
            && !self.popup_rect_next.is_some_and(|r| r.contains(mouse))
        {
            self.open_combo = None;
            self.popup_rect_next = None;
        }
        if !self.input.buttons.left {
            self.drag = None;
        }

        gfx.submit_overlay(self.painter.list());
        gfx.submit_overlay(self.popup.list());
        self.in_frame = false;
    }

    // ── windows ───────────────────────────────────────────────────────────

    pub fn set_next_window_pos(&mut self, x: f32, y: f32, cond: Cond) {
        self.next_pos = Some((Vec2::new(x, y), cond));
    }

    pub fn set_next_window_size(&mut self, width: f32, height: f32, cond: Cond) {
        self.next_size = Some((Vec2::new(width, height), cond));
    }

    /// Starts a window. Pair with [`end`](Self::end).
    pub fn begin(&mut self, title: &str) -> bool {
        if self.current.is_some() {
            log::warn!("ui: begin(`{title}`) inside another window; closing it");
            self.end();
        }

        let id = widget_id(0, title);
        let style = self.style;
        let title_h = self.title_height();
        let (next_pos, next_size) = (self.next_pos.take(), self.next_size.take());
        let (view_w, view_h) = (self.input.width as f32, self.input.height as f32);

        let created = !self.windows.contains_key(&id);
        let window = self.windows.entry(id).or_insert_with(|| WindowState {
            pos: Vec2::new(60.0, 60.0),
            size: Vec2::new(style.min_window_width, title_h),
            auto_size: true,
            content: Vec2::zero(),
            seen: false,
        });

        if let Some((pos, cond)) = next_pos {
            if cond == Cond::Always || created {
                window.pos = pos;
            }
        }
        if let Some((size, cond)) = next_size {
            if cond == Cond::Always || created {
                window.size = size;
                window.auto_size = false;
            }
        }
        if window.auto_size {
            window.size = Vec2::new(
                window.content.x.max(style.min_window_width),
                window.content.y.max(title_h),
            );
        }
        window.pos.x = window.pos.x.min(view_w - KEEP_VISIBLE).max(KEEP_VISIBLE - window.size.x);
        window.pos.y = window.pos.y.min(view_h - title_h).max(0.0);
        window.seen = true;
        let rect = window.rect();

        if !self.order.contains(&id) {
            self.order.push(id);
        }

        let mouse = self.mouse();
        let title_rect = Rect::new(rect.origin.x, rect.origin.y, rect.size.x, title_h);
        if self.pressed() && self.hovered_window == Some(id) && !self.popup_blocks(mouse) {
            self.order.retain(|&w| w != id);
            self.order.push(id);
            if title_rect.contains(mouse) {
                self.drag = Some((id, mouse - rect.origin));
            }
        }

        let depth = self.order.iter().position(|&w| w == id).unwrap_or(0) as i32;
        let front = self.order.last() == Some(&id);

        self.painter.set_layer((depth + 1) * LAYER_STRIDE);
        self.painter.fill_rect(rect, style.window_bg);
        self.painter.fill_rect(
            title_rect,
            if front { style.title_bg_active } else { style.title_bg },
        );
        self.painter.outline(rect, 1.0, style.border);

        self.painter.push_clip(title_rect);
        self.painter.text(
            visible_label(title),
            self.font,
            style.font_size,
            style.text,
            Vec2::new(
                rect.origin.x + style.window_padding.x,
                rect.origin.y + style.frame_padding.y,
            ),
        );
        self.painter.pop_clip();

        let content = Rect::new(
            rect.origin.x,
            rect.origin.y + title_h,
            rect.size.x,
            (rect.size.y - title_h).max(0.0),
        );
        self.painter.push_clip(content);

        let cursor = Vec2::new(
            rect.origin.x + style.window_padding.x,
            content.origin.y + style.window_padding.y,
        );
        self.current = Some(WindowFrame { id, rect, cursor, max: cursor });
        true
    }

    /// Ends the window started by the last [`begin`](Self::begin).
    pub fn end(&mut self) {
        let Some(frame) = self.current.take() else {
            log::warn!("ui: end without begin");
            return;
        };
        self.painter.pop_clip();

        let pad = self.style.window_padding;
        if let Some(window) = self.windows.get_mut(&frame.id) {
            window.content = Vec2::new(
                frame.max.x - frame.rect.origin.x + pad.x,
                frame.max.y - frame.rect.origin.y + pad.y,
            );
        }
    }

    // ── widgets ───────────────────────────────────────────────────────────

    pub fn text(&mut self, text: &str) {
        let w = self.metrics.width(text);
        let h = self.metrics.line_height;
        let Some(rect) = self.item_rect(w, h) else { return };
        self.painter
            .text(text, self.font, self.style.font_size, self.style.text, rect.origin);
    }

    /// Toggles `value` when clicked. Returns `true` on the frame it changes.
    pub fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
        let shown = visible_label(label);
        let side = self.frame_height();
        let w = side + self.label_extent(shown);
        let Some(rect) = self.item_rect(w, side) else { return false };

        let hovered = self.hovered(rect);
        let changed = hovered && self.pressed();
        if changed {
            *value = !*value;
        }

        let style = self.style;
        let check = Rect::new(rect.origin.x, rect.origin.y, side, side);
        self.painter.fill_rect(
            check,
            if hovered { style.frame_bg_hovered } else { style.frame_bg },
        );
        if *value {
            let inset = (side * 0.25).round();
            self.painter.fill_rect(check.inset(inset), style.check_mark);
        }
        self.draw_label(shown, check.right() + style.inner_spacing, rect.origin.y);
        changed
    }

    /// Returns `true` on the frame the button is pressed.
    pub fn button(&mut self, label: &str) -> bool {
        let shown = visible_label(label);
        let style = self.style;
        let w = self.metrics.width(shown) + style.frame_padding.x * 2.0;
        let Some(rect) = self.item_rect(w, self.frame_height()) else { return false };

        let hovered = self.hovered(rect);
        self.painter.fill_rect(
            rect,
            if hovered { style.button_hovered } else { style.button },
        );
        self.draw_label(shown, rect.origin.x + style.frame_padding.x, rect.origin.y);
        hovered && self.pressed()
    }

    /// Horizontal rule across the window.
    pub fn separator(&mut self) {
        let Some(frame) = self.current.as_ref() else {
            log::warn!("ui: separator outside a window");
            return;
        };
        let w = (frame.rect.size.x - self.style.window_padding.x * 2.0).max(0.0);
        let Some(rect) = self.item_rect(w, 1.0) else { return };
        self.painter.fill_rect(rect, self.style.border);
    }

    /// Drop-down list. Returns `true` on the frame `selected` changes.
    ///
    /// The list opens on click and is drawn above all windows.
    pub fn combo(&mut self, label: &str, selected: &mut usize, items: &[&str]) -> bool {
        let Some(window) = self.current.as_ref().map(|f| f.id) else {
            log::warn!("ui: combo `{label}` outside a window");
            return false;
        };
        let id = widget_id(window, label);
        let shown = visible_label(label);
        let style = self.style;
        let side = self.frame_height();

        let widest = items.iter().map(|s| self.metrics.width(s)).fold(0.0, f32::max);
        let box_w = widest + style.frame_padding.x * 2.0 + side;
        let w = box_w + self.label_extent(shown);
        let Some(rect) = self.item_rect(w, side) else { return false };
        let field = Rect::new(rect.origin.x, rect.origin.y, box_w, side);

        let hovered = self.hovered(field);
        if hovered && self.pressed() {
            self.open_combo = if self.open_combo == Some(id) { None } else { Some(id) };
            self.combo_toggled = true;
        }

        // Wheel over the closed box steps through the items, up selects the previous one.
        let mut stepped = false;
        let steps = self.wheel.trunc() as i64;
        if hovered && steps != 0 && self.open_combo != Some(id) && !items.is_empty() {
            let last = items.len() as i64 - 1;
            let next = (*selected as i64).min(last).saturating_sub(steps).clamp(0, last) as usize;
            stepped = next != *selected;
            *selected = next;
        }

        self.painter.fill_rect(
            field,
            if hovered { style.frame_bg_hovered } else { style.frame_bg },
        );
        self.painter.fill_rect(
            Rect::new(field.right() - side, field.origin.y, side, side),
            if hovered { style.button_hovered } else { style.button },
        );
        let preview = items.get(*selected).copied().unwrap_or("");
        self.draw_label(preview, field.origin.x + style.frame_padding.x, field.origin.y);
        self.draw_label(shown, field.right() + style.inner_spacing, field.origin.y);

        if self.open_combo != Some(id) {
            return stepped;
        }
        self.combo_popup(field, selected, items)
    }

    fn combo_popup(&mut self, field: Rect, selected: &mut usize, items: &[&str]) -> bool {
        let style = self.style;
        let item_h = self.metrics.line_height;
        let pad = style.frame_padding.y;
        let popup = Rect::new(
            field.origin.x,
            field.bottom(),
            field.size.x,
            items.len() as f32 * item_h + pad * 2.0,
        );
        self.popup_rect_next = Some(popup);

        self.popup.set_layer(POPUP_LAYER);
        self.popup.fill_rect(popup, style.popup_bg);
        self.popup.outline(popup, 1.0, style.border);

        let mouse = self.mouse();
        let mut changed = false;
        for (i, item) in items.iter().enumerate() {
            let row = Rect::new(popup.origin.x, popup.origin.y + pad + i as f32 * item_h, popup.size.x, item_h);
            let hovered = row.contains(mouse);
            if hovered && self.pressed() && !self.combo_toggled {
                *selected = i;
                changed = true;
            }
            if hovered {
                self.popup.fill_rect(row, style.header_hovered);
            } else if i == *selected {
                self.popup.fill_rect(row, style.header);
            }
            self.popup.text(
                item,
                self.font,
                style.font_size,
                style.text,
                Vec2::new(row.origin.x + style.frame_padding.x, row.origin.y),
            );
        }

        if changed {
            self.open_combo = None;
            self.popup_rect_next = None;
        }
        changed
    }

    // ── helpers ───────────────────────────────────────────────────────────

    fn mouse(&self) -> Vec2 {
        Vec2::new(self.input.mouse_x, self.input.mouse_y)
    }

    /// Left button went down this frame.
    fn pressed(&self) -> bool {
        self.input.buttons.left && !self.prev_buttons.left
    }

    fn popup_blocks(&self, p: Vec2) -> bool {
        self.popup_rect.is_some_and(|r| r.contains(p))
    }

    fn hovered(&self, rect: Rect) -> bool {
        let Some(frame) = self.current.as_ref() else { return false };
        let mouse = self.mouse();
        rect.contains(mouse)
            && frame.rect.contains(mouse)
            && self.hovered_window == Some(frame.id)
            && self.drag.is_none()
            && !self.popup_blocks(mouse)
    }

    fn frame_height(&self) -> f32 {
        self.metrics.line_height + self.style.frame_padding.y * 2.0
    }

    fn title_height(&self) -> f32 {
        self.frame_height()
    }

    fn label_extent(&self, shown: &str) -> f32 {
        if shown.is_empty() {
            0.0
        } else {
            self.style.inner_spacing + self.metrics.width(shown)
        }
    }

    fn draw_label(&mut self, text: &str, x: f32, top: f32) {
        let y = top + self.style.frame_padding.y;
        self.painter
            .text(text, self.font, self.style.font_size, self.style.text, Vec2::new(x, y));
    }

    /// Places the next item below the previous one.
    fn item_rect(&mut self, w: f32, h: f32) -> Option<Rect> {
        let Some(frame) = self.current.as_mut() else {
            log::warn!("ui: widget outside a window");
            return None;
        };
        let rect = Rect::new(frame.cursor.x, frame.cursor.y, w, h);
        frame.cursor.y += h + self.style.item_spacing;
        frame.max.x = frame.max.x.max(rect.right());
        frame.max.y = frame.max.y.max(rect.bottom());
        self.last_item = rect;
        Some(rect)
    }
}

impl Drop for Ui {
    fn drop(&mut self) {
        log::debug!("ui context destroyed ({} windows)", self.windows.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_engine::gfx::{Init, RendererType};
    use vela_engine::scene::DrawCmd;

    const TITLE: &str = "Settings";

    fn headless_gfx() -> Gfx {
        let mut gfx = Gfx::new();
        gfx.init(Init { renderer_type: RendererType::Noop, ..Init::default() })
            .unwrap();
        gfx
    }

    fn input(x: f32, y: f32, left: bool) -> UiInput {
        UiInput {
            mouse_x: x,
            mouse_y: y,
            buttons: UiButtons { left, ..UiButtons::default() },
            scroll: 0.0,
            width: 1280,
            height: 720,
        }
    }

    /// A new window sizes itself to its content one frame late.
    fn warm_up(ui: &mut Ui, gfx: &mut Gfx, flag: &mut bool, sel: &mut usize) -> (Rect, Rect) {
        settings_frame(ui, gfx, input(0.0, 0.0, false), flag, sel);
        let (check, combo, ..) = settings_frame(ui, gfx, input(0.0, 0.0, false), flag, sel);
        (check, combo)
    }

    fn center(r: Rect) -> (f32, f32) {
        (r.origin.x + r.size.x * 0.5, r.origin.y + r.size.y * 0.5)
    }

    /// Runs one frame with a settings window holding a checkbox and a combo.
    /// Returns (checkbox rect, combo rect, checkbox changed, combo changed).
    fn settings_frame(
        ui: &mut Ui,
        gfx: &mut Gfx,
        inp: UiInput,
        flag: &mut bool,
        sel: &mut usize,
    ) -> (Rect, Rect, bool, bool) {
        ui.begin_frame(inp, gfx.fonts());
        ui.set_next_window_pos(10.0, 10.0, Cond::FirstUseEver);
        ui.begin(TITLE);
        let toggled = ui.checkbox("Write R", flag);
        let check_rect = ui.last_item_rect();
        let picked = ui.combo("Primitive topology", sel, &["A", "B", "C"]);
        let combo_rect = ui.last_item_rect();
        ui.end();
        ui.end_frame(gfx);
        (check_rect, combo_rect, toggled, picked)
    }

    // ── labels ────────────────────────────────────────────────────────────

    #[test]
    fn hidden_label_part() {
        assert_eq!(visible_label("Lines##topology"), "Lines");
        assert_eq!(visible_label("##only-id"), "");
        assert_eq!(visible_label("plain"), "plain");
        assert_ne!(widget_id(1, "A##1"), widget_id(1, "A##2"));
        assert_ne!(widget_id(1, "A"), widget_id(2, "A"));
    }

    // ── windows ───────────────────────────────────────────────────────────

    #[test]
    fn first_use_position_applies_once() {
        let mut gfx = headless_gfx();
        let mut ui = Ui::new(None);
        for pos in [10.0, 200.0] {
            ui.begin_frame(input(0.0, 0.0, false), gfx.fonts());
            ui.set_next_window_pos(pos, pos, Cond::FirstUseEver);
            ui.begin(TITLE);
            ui.end();
            ui.end_frame(&mut gfx);
        }
        assert_eq!(ui.window_rect(TITLE).unwrap().origin, Vec2::new(10.0, 10.0));

        ui.begin_frame(input(0.0, 0.0, false), gfx.fonts());
        ui.set_next_window_pos(200.0, 150.0, Cond::Always);
        ui.begin(TITLE);
        ui.end();
        ui.end_frame(&mut gfx);
        assert_eq!(ui.window_rect(TITLE).unwrap().origin, Vec2::new(200.0, 150.0));
    }

    #[test]
    fn explicit_size_disables_auto_size() {
        let mut gfx = headless_gfx();
        let mut ui = Ui::new(None);
        ui.begin_frame(input(0.0, 0.0, false), gfx.fonts());
        ui.set_next_window_size(320.0, 240.0, Cond::FirstUseEver);
        ui.begin(TITLE);
        ui.text("hello");
        ui.end();
        ui.end_frame(&mut gfx);
        assert_eq!(ui.window_rect(TITLE).unwrap().size, Vec2::new(320.0, 240.0));
    }

    #[test]
    fn title_bar_drags_window() {
        let mut gfx = headless_gfx();
        let mut ui = Ui::new(None);
        let frame = |ui: &mut Ui, gfx: &mut Gfx, x: f32, y: f32, left: bool| {
            ui.begin_frame(input(x, y, left), gfx.fonts());
            ui.set_next_window_pos(10.0, 10.0, Cond::FirstUseEver);
            ui.begin(TITLE);
            ui.end();
            ui.end_frame(gfx);
        };
        frame(&mut ui, &mut gfx, 0.0, 0.0, false);
        frame(&mut ui, &mut gfx, 20.0, 15.0, true);
        frame(&mut ui, &mut gfx, 70.0, 45.0, true);
        frame(&mut ui, &mut gfx, 70.0, 45.0, false);
        assert_eq!(ui.window_rect(TITLE).unwrap().origin, Vec2::new(60.0, 40.0));
    }

    // ── widgets ───────────────────────────────────────────────────────────

    #[test]
    fn checkbox_toggles_once_per_press() {
        let mut gfx = headless_gfx();
        let mut ui = Ui::new(None);
        let (mut flag, mut sel) = (true, 0);

        let (rect, _) = warm_up(&mut ui, &mut gfx, &mut flag, &mut sel);
        let (x, y) = center(rect);

        let (_, _, toggled, _) = settings_frame(&mut ui, &mut gfx, input(x, y, true), &mut flag, &mut sel);
        assert!(toggled);
        assert!(!flag);

        let (_, _, toggled, _) = settings_frame(&mut ui, &mut gfx, input(x, y, true), &mut flag, &mut sel);
        assert!(!toggled);
        assert!(!flag);
    }

    #[test]
    fn combo_opens_and_selects() {
        let mut gfx = headless_gfx();
        let mut ui = Ui::new(None);
        let (mut flag, mut sel) = (false, 0);

        let (_, combo) = warm_up(&mut ui, &mut gfx, &mut flag, &mut sel);
        let field_x = combo.origin.x + 2.0;
        let field_y = combo.origin.y + 2.0;

        settings_frame(&mut ui, &mut gfx, input(field_x, field_y, true), &mut flag, &mut sel);
        assert!(ui.is_popup_open());
        settings_frame(&mut ui, &mut gfx, input(field_x, field_y, false), &mut flag, &mut sel);
        assert!(ui.is_popup_open());

        // Third row of the popup below the field.
        let item_h = ui.metrics.line_height;
        let row_y = combo.bottom() + ui.style.frame_padding.y + item_h * 2.5;
        let (_, _, _, picked) = settings_frame(&mut ui, &mut gfx, input(field_x, row_y, true), &mut flag, &mut sel);
        assert!(picked);
        assert_eq!(sel, 2);
        assert!(!ui.is_popup_open());
    }

    #[test]
    fn wheel_over_closed_combo_steps_selection() {
        let mut gfx = headless_gfx();
        let mut ui = Ui::new(None);
        let (mut flag, mut sel) = (false, 0);

        let (_, combo) = warm_up(&mut ui, &mut gfx, &mut flag, &mut sel);
        let (x, y) = (combo.origin.x + 2.0, combo.origin.y + 2.0);
        let wheel = |scroll: f32| UiInput { scroll, ..input(x, y, false) };

        let (_, _, _, picked) = settings_frame(&mut ui, &mut gfx, wheel(-2.0), &mut flag, &mut sel);
        assert!(picked);
        assert_eq!(sel, 2);

        // Already on the last item.
        let (_, _, _, picked) = settings_frame(&mut ui, &mut gfx, wheel(-5.0), &mut flag, &mut sel);
        assert!(!picked);
        assert_eq!(sel, 2);

        settings_frame(&mut ui, &mut gfx, wheel(-4.0), &mut flag, &mut sel);
        assert_eq!(sel, 1);
        assert!(!ui.is_popup_open());

        // Away from the box the wheel does nothing.
        settings_frame(&mut ui, &mut gfx, UiInput { scroll: 3.0, ..input(900.0, 600.0, false) }, &mut flag, &mut sel);
        assert_eq!(sel, 1);
    }

    #[test]
    fn click_outside_closes_combo() {
        let mut gfx = headless_gfx();
        let mut ui = Ui::new(None);
        let (mut flag, mut sel) = (false, 1);

        let (_, combo) = warm_up(&mut ui, &mut gfx, &mut flag, &mut sel);
        let (x, y) = (combo.origin.x + 2.0, combo.origin.y + 2.0);
        settings_frame(&mut ui, &mut gfx, input(x, y, true), &mut flag, &mut sel);
        settings_frame(&mut ui, &mut gfx, input(x, y, false), &mut flag, &mut sel);
        assert!(ui.is_popup_open());

        settings_frame(&mut ui, &mut gfx, input(1000.0, 600.0, true), &mut flag, &mut sel);
        assert!(!ui.is_popup_open());
        assert_eq!(sel, 1);
    }

    #[test]
    fn open_popup_blocks_widgets_below_it() {
        let mut gfx = headless_gfx();
        let mut ui = Ui::new(None);
        let frame = |ui: &mut Ui, gfx: &mut Gfx, inp: UiInput, sel: &mut usize, flag: &mut bool| {
            ui.begin_frame(inp, gfx.fonts());
            ui.set_next_window_pos(10.0, 10.0, Cond::FirstUseEver);
            ui.begin(TITLE);
            ui.combo("Mode", sel, &["One", "Two", "Three", "Four"]);
            let combo = ui.last_item_rect();
            let toggled = ui.checkbox("Below", flag);
            let check = ui.last_item_rect();
            ui.end();
            ui.end_frame(gfx);
            (combo, check, toggled)
        };
        let (mut sel, mut flag) = (0, false);

        frame(&mut ui, &mut gfx, input(0.0, 0.0, false), &mut sel, &mut flag);
        let (combo, check, _) = frame(&mut ui, &mut gfx, input(0.0, 0.0, false), &mut sel, &mut flag);
        let (x, y) = (combo.origin.x + 2.0, combo.origin.y + 2.0);
        frame(&mut ui, &mut gfx, input(x, y, true), &mut sel, &mut flag);
        frame(&mut ui, &mut gfx, input(x, y, false), &mut sel, &mut flag);

        // The checkbox sits under the open list: the click picks a list row instead.
        let (cx, cy) = (check.origin.x + 2.0, check.origin.y + 2.0);
        let (_, _, toggled) = frame(&mut ui, &mut gfx, input(cx, cy, true), &mut sel, &mut flag);
        assert!(!toggled);
        assert!(!flag);
        assert!(!ui.is_popup_open());
    }

    #[test]
    fn end_frame_feeds_renderer_overlay() {
        let mut gfx = headless_gfx();
        let mut ui = Ui::new(None);
        let (mut flag, mut sel) = (true, 0);
        settings_frame(&mut ui, &mut gfx, input(0.0, 0.0, false), &mut flag, &mut sel);
        gfx.frame();

        let overlay = &gfx.last_frame().overlay;
        assert!(!overlay.is_empty());
        assert!(overlay.items().iter().all(|i| matches!(i.cmd, DrawCmd::Rect(_))));
        assert!(overlay.items().iter().all(|i| i.key.z < ZIndex::DEBUG_TEXT));
    }
}
