use vela_engine::text::{FontId, FontSystem};

const FIRST: char = ' ';
const LAST: char = '~';

/// Cached advances for printable ASCII at one font size.
///
/// Without a font, widths are estimated so layout and hit testing still work.
#[derive(Debug, Clone)]
pub(crate) struct TextMetrics {
    key: Option<(FontId, u32)>,
    advances: Vec<f32>,
    fallback: f32,
    pub line_height: f32,
}

impl TextMetrics {
    pub fn estimated(size: f32) -> Self {
        Self {
            key: None,
            advances: Vec::new(),
            fallback: (size * 0.5).round(),
            line_height: (size * 1.2).round(),
        }
    }

    pub fn from_font(fonts: &FontSystem, font: FontId, size: f32) -> Self {
        let mut buf = [0u8; 4];
        let advances = (FIRST..=LAST)
            .map(|c| fonts.measure_text(c.encode_utf8(&mut buf), font, size).x)
            .collect();
        let probe = fonts.measure_text("?", font, size);
        Self {
            key: Some((font, size.to_bits())),
            advances,
            fallback: probe.x,
            line_height: probe.y.ceil(),
        }
    }

    pub fn is_for(&self, font: FontId, size: f32) -> bool {
        self.key == Some((font, size.to_bits()))
    }

    pub fn width(&self, text: &str) -> f32 {
        text.chars()
            .map(|c| {
                let idx = (c as usize).wrapping_sub(FIRST as usize);
                self.advances.get(idx).copied().unwrap_or(self.fallback)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_scales_with_length() {
        let m = TextMetrics::estimated(16.0);
        assert_eq!(m.width(""), 0.0);
        assert_eq!(m.width("abcd"), 32.0);
        assert_eq!(m.line_height, 19.0);
    }
}
