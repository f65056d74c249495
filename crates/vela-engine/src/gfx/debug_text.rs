//! Debug text grid.
//!
//! A character grid laid over the backbuffer in 8×16 pixel cells. Each cell
//! holds a character byte and an attribute byte: low nibble is the foreground
//! palette index, high nibble the background index. Background 0 is
//! transparent.
//!
//! `print` understands `ESC [ fg ; bg m` color escapes. Either number may be
//! omitted to keep the current value, and `ESC [0m` restores the attribute the
//! call started with.

use std::iter::Peekable;
use std::str::Chars;

use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::scene::{DrawList, ZIndex};
use crate::text::FontId;

pub const CELL_WIDTH: u32 = 8;
pub const CELL_HEIGHT: u32 = 16;

const ESC: char = '\x1b';

/// VGA text-mode palette, packed `0xRRGGBBAA`.
pub const PALETTE: [u32; 16] = [
    0x000000ff, // black
    0x0000aaff, // blue
    0x00aa00ff, // green
    0x00aaaaff, // cyan
    0xaa0000ff, // red
    0xaa00aaff, // magenta
    0xaa5500ff, // brown
    0xaaaaaaff, // light gray
    0x555555ff, // dark gray
    0x5555ffff, // light blue
    0x55ff55ff, // light green
    0x55ffffff, // light cyan
    0xff5555ff, // light red
    0xff55ffff, // light magenta
    0xffff55ff, // yellow
    0xffffffff, // white
];

/// One character cell.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Cell {
    pub ch: u8,
    pub attr: u8,
}

impl Cell {
    #[inline]
    pub fn fg(self) -> u8 {
        self.attr & 0x0f
    }

    #[inline]
    pub fn bg(self) -> u8 {
        self.attr >> 4
    }

    fn is_blank(self) -> bool {
        self.ch == 0 || self.ch == b' '
    }
}

/// Backing store for the debug text grid.
#[derive(Debug, Clone, Default)]
pub struct TextVideoMem {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl TextVideoMem {
    /// Creates a grid covering a `width_px` × `height_px` backbuffer.
    pub fn new(width_px: u32, height_px: u32) -> Self {
        let mut mem = Self::default();
        mem.resize(width_px, height_px);
        mem
    }

    /// Resizes for a new backbuffer size. Contents are cleared when the grid changes.
    pub fn resize(&mut self, width_px: u32, height_px: u32) {
        let width = (width_px / CELL_WIDTH).clamp(1, u16::MAX as u32) as u16;
        let height = (height_px / CELL_HEIGHT).clamp(1, u16::MAX as u32) as u16;
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::default(); width as usize * height as usize];
    }

    /// Grid width in characters.
    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Grid height in characters.
    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn clear(&mut self, attr: u8) {
        self.cells.fill(Cell { ch: 0, attr });
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[self.index(x, y)])
    }

    /// Row `y` as text, blank cells as spaces, trailing blanks trimmed.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = self.index(0, y);
        let row = &self.cells[start..start + self.width as usize];
        let s: String = row
            .iter()
            .map(|c| if c.is_blank() { ' ' } else { cell_char(c.ch) })
            .collect();
        s.trim_end().to_string()
    }

    /// Writes `text` at cell (`x`, `y`) with `attr`, clipping at the grid edge.
    pub fn print(&mut self, x: u16, y: u16, attr: u8, text: &str) {
        if y >= self.height {
            return;
        }

        let mut cur = attr;
        let mut col = x as usize;
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if c == ESC {
                if let Some(next) = parse_escape(&mut chars, cur, attr) {
                    cur = next;
                }
                continue;
            }

            if col < self.width as usize {
                let idx = self.index(col as u16, y);
                self.cells[idx] = Cell { ch: char_byte(c), attr: cur };
            }
            col += 1;
        }
    }

    /// Copies a `w` × `h` block of (char, attr) byte pairs to cell (`x`, `y`).
    ///
    /// `pitch` is the byte distance between rows in `data`.
    pub fn image(&mut self, x: u16, y: u16, w: u16, h: u16, data: &[u8], pitch: usize) {
        for row in 0..h {
            let ty = y as usize + row as usize;
            if ty >= self.height as usize {
                break;
            }
            let src_row = row as usize * pitch;
            for colx in 0..w {
                let tx = x as usize + colx as usize;
                if tx >= self.width as usize {
                    break;
                }
                let src = src_row + colx as usize * 2;
                let (Some(&ch), Some(&attr)) = (data.get(src), data.get(src + 1)) else {
                    return;
                };
                let idx = self.index(tx as u16, ty as u16);
                self.cells[idx] = Cell { ch, attr };
            }
        }
    }

    /// Records the grid into `list`: background runs as rects, foreground runs as text.
    ///
    /// `font` is `(font, size)` sized so one glyph advance equals [`CELL_WIDTH`].
    /// Without a font only backgrounds are drawn.
    pub fn to_draw_list(&self, list: &mut DrawList, font: Option<(FontId, f32)>, z: ZIndex) {
        for y in 0..self.height {
            let start = self.index(0, y);
            let row = &self.cells[start..start + self.width as usize];
            let top = y as f32 * CELL_HEIGHT as f32;

            for (x0, len, bg) in runs(row, |c| (c.bg() != 0).then_some(c.bg())) {
                list.push_rect(
                    z,
                    Rect::new(
                        x0 as f32 * CELL_WIDTH as f32,
                        top,
                        len as f32 * CELL_WIDTH as f32,
                        CELL_HEIGHT as f32,
                    ),
                    Color::from_rgba_u32(PALETTE[bg as usize]),
                );
            }

            let Some((font, size)) = font else { continue };
            let text_z = z.offset(1);
            let baseline_pad = ((CELL_HEIGHT as f32 - size * 1.15) * 0.5).max(0.0);

            for (x0, len, fg) in runs(row, |c| (!c.is_blank()).then_some(c.fg())) {
                let text: String = row[x0..x0 + len].iter().map(|c| cell_char(c.ch)).collect();
                list.push_text(
                    text_z,
                    text,
                    font,
                    size,
                    Color::from_rgba_u32(PALETTE[fg as usize]),
                    Vec2::new(x0 as f32 * CELL_WIDTH as f32, top + baseline_pad),
                );
            }
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Parses the rest of an escape after `ESC`. Returns the new attribute, or
/// `None` if the sequence is malformed (it is then dropped).
fn parse_escape(chars: &mut Peekable<Chars<'_>>, cur: u8, base: u8) -> Option<u8> {
    chars.next_if_eq(&'[')?;

    let fg = parse_number(chars);
    let separated = chars.next_if_eq(&';').is_some();
    let bg = if separated { parse_number(chars) } else { None };
    chars.next_if_eq(&'m')?;

    if fg == Some(0) && !separated {
        return Some(base);
    }

    let mut attr = cur;
    if let Some(fg) = fg {
        attr = (attr & 0xf0) | (fg & 0x0f);
    }
    if let Some(bg) = bg {
        attr = (attr & 0x0f) | ((bg & 0x0f) << 4);
    }
    Some(attr)
}

/// Reads a decimal number, skipping leading spaces.
fn parse_number(chars: &mut Peekable<Chars<'_>>) -> Option<u8> {
    while chars.next_if_eq(&' ').is_some() {}
    let mut value: Option<u32> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(d));
    }
    value.map(|v| v.min(255) as u8)
}

/// Splits a row into maximal runs of equal keys; cells keyed `None` end a run.
fn runs(row: &[Cell], key: impl Fn(Cell) -> Option<u8>) -> Vec<(usize, usize, u8)> {
    let mut out = Vec::new();
    let mut x = 0;
    while x < row.len() {
        let Some(k) = key(row[x]) else {
            x += 1;
            continue;
        };
        let mut end = x + 1;
        while end < row.len() && key(row[end]) == Some(k) {
            end += 1;
        }
        out.push((x, end - x, k));
        x = end;
    }
    out
}

fn char_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '█' => 0xdb,
        '▄' => 0xdc,
        '▀' => 0xdf,
        '░' => 0xb0,
        '▒' => 0xb1,
        '▓' => 0xb2,
        '■' => 0xfe,
        _ => b'?',
    }
}

fn cell_char(b: u8) -> char {
    match b {
        0 => ' ',
        0x20..=0x7e => b as char,
        0xdb => '█',
        0xdc => '▄',
        0xdf => '▀',
        0xb0 => '░',
        0xb1 => '▒',
        0xb2 => '▓',
        0xfe => '■',
        _ => '?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::DrawCmd;

    fn mem() -> TextVideoMem {
        TextVideoMem::new(640, 480)
    }

    // ── sizing ────────────────────────────────────────────────────────────

    #[test]
    fn grid_size_follows_backbuffer() {
        let m = TextVideoMem::new(1280, 720);
        assert_eq!((m.width(), m.height()), (160, 45));
    }

    #[test]
    fn resize_clears_only_on_change() {
        let mut m = mem();
        m.print(0, 0, 0x0f, "keep");
        m.resize(640, 480);
        assert_eq!(m.row_text(0), "keep");
        m.resize(800, 600);
        assert_eq!(m.row_text(0), "");
    }

    // ── print ─────────────────────────────────────────────────────────────

    #[test]
    fn print_writes_chars_and_attr() {
        let mut m = mem();
        m.print(2, 1, 0x1e, "Hi");
        assert_eq!(m.cell(2, 1), Some(Cell { ch: b'H', attr: 0x1e }));
        assert_eq!(m.cell(3, 1), Some(Cell { ch: b'i', attr: 0x1e }));
        assert_eq!(m.row_text(1), "  Hi");
    }

    #[test]
    fn print_clips_at_right_edge() {
        let mut m = mem();
        m.print(78, 0, 0x0f, "abcd");
        assert_eq!(m.row_text(0).trim(), "ab");
        m.print(0, 99, 0x0f, "off grid");
    }

    #[test]
    fn ansi_sets_foreground_and_resets() {
        let mut m = mem();
        m.print(0, 0, 0x0f, "a\x1b[9;mb\x1b[0mc");
        assert_eq!(m.cell(0, 0).unwrap().attr, 0x0f);
        assert_eq!(m.cell(1, 0).unwrap().attr, 0x09);
        assert_eq!(m.cell(2, 0).unwrap().attr, 0x0f);
        assert_eq!(m.row_text(0), "abc");
    }

    #[test]
    fn ansi_sets_background_keeping_foreground() {
        let mut m = mem();
        m.print(0, 0, 0x0f, "\x1b[;4m \x1b[;0mx");
        assert_eq!(m.cell(0, 0).unwrap().attr, 0x4f);
        assert_eq!(m.cell(1, 0).unwrap().attr, 0x0f);
    }

    #[test]
    fn ansi_numbers_may_have_leading_spaces() {
        let mut m = mem();
        m.print(0, 0, 0x0f, "\x1b[; 2m \x1b[0m");
        assert_eq!(m.cell(0, 0).unwrap().attr, 0x2f);
    }

    #[test]
    fn ansi_sets_both_colors() {
        let mut m = mem();
        m.print(0, 0, 0x00, "\x1b[14;1mY");
        assert_eq!(m.cell(0, 0).unwrap().attr, 0x1e);
    }

    #[test]
    fn malformed_escape_is_dropped() {
        let mut m = mem();
        m.print(0, 0, 0x0f, "a\x1bXb");
        assert_eq!(m.row_text(0), "aXb");
    }

    // ── image ─────────────────────────────────────────────────────────────

    #[test]
    fn image_copies_pairs_with_pitch() {
        let mut m = mem();
        // 2×2 block inside a 3-cell-wide source (pitch 6 bytes).
        let data = [
            b'A', 0x01, b'B', 0x02, b'-', 0x00,
            b'C', 0x03, b'D', 0x04, b'-', 0x00,
        ];
        m.image(5, 2, 2, 2, &data, 6);
        assert_eq!(m.cell(5, 2), Some(Cell { ch: b'A', attr: 0x01 }));
        assert_eq!(m.cell(6, 3), Some(Cell { ch: b'D', attr: 0x04 }));
        assert_eq!(m.cell(7, 2), Some(Cell::default()));
    }

    #[test]
    fn image_stops_at_short_data() {
        let mut m = mem();
        m.image(0, 0, 4, 4, &[b'x', 0x0f], 8);
        assert_eq!(m.row_text(0), "x");
        assert_eq!(m.row_text(1), "");
    }

    // ── overlay ───────────────────────────────────────────────────────────

    #[test]
    fn backgrounds_merge_into_runs() {
        let mut m = mem();
        m.print(0, 0, 0x0f, "\x1b[;1m   \x1b[;2m  ");
        let mut list = DrawList::new();
        m.to_draw_list(&mut list, None, ZIndex::DEBUG_TEXT);

        let rects: Vec<Rect> = list
            .items()
            .iter()
            .filter_map(|i| match &i.cmd {
                DrawCmd::Rect(r) => Some(r.rect),
                _ => None,
            })
            .collect();
        assert_eq!(rects, vec![Rect::new(0.0, 0.0, 24.0, 16.0), Rect::new(24.0, 0.0, 16.0, 16.0)]);
    }

    #[test]
    fn text_runs_split_on_color() {
        let mut m = mem();
        m.print(1, 2, 0x0f, "ab\x1b[12;mcd");
        let mut list = DrawList::new();
        m.to_draw_list(&mut list, Some((FontId(0), 13.0)), ZIndex::DEBUG_TEXT);

        let texts: Vec<(String, f32, f32)> = list
            .items()
            .iter()
            .filter_map(|i| match &i.cmd {
                DrawCmd::Text(t) => Some((t.text.clone(), t.origin.x, t.origin.y.floor())),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec![("ab".to_string(), 8.0, 32.0), ("cd".to_string(), 24.0, 32.0)]);
    }
}
