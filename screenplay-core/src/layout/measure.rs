use super::style::ElementStyle;
use crate::types::ScreenplayElement;

/// Reports the rendered height of an element once its style is applied.
///
/// Heights must include the element's own top and bottom margins and be in
/// the same unit as the paginator's available height. `None` means the
/// collaborator could not measure; the paginator never guesses a height.
pub trait HeightMeasurer {
    fn height_of(&self, element: &ScreenplayElement, style: &ElementStyle) -> Option<f32>;
}

/// Deterministic stand-in for a real renderer: wraps words greedily on a
/// fixed-advance font and counts lines
#[derive(Debug, Clone)]
pub struct MonospaceMeasurer {
    /// Width of the page content box in pixels
    pub content_width: f32,
    /// Advance width of one glyph as a fraction of the font size
    pub char_width_ratio: f32,
}

impl MonospaceMeasurer {
    pub fn new(content_width: f32) -> Self {
        Self {
            content_width,
            char_width_ratio: 0.6,
        }
    }

    /// Glyphs that fit on one line of an element rendered with `style`
    pub fn chars_per_line(&self, style: &ElementStyle) -> Option<usize> {
        let usable = self.content_width - style.indent_start - style.indent_end;
        let advance = style.font_size * self.char_width_ratio;
        if !usable.is_finite() || !advance.is_finite() || usable <= 0.0 || advance <= 0.0 {
            return None;
        }
        Some(((usable / advance).floor() as usize).max(1))
    }

    /// Lines needed for `text` when wrapped at `width` glyphs
    pub fn wrapped_line_count(text: &str, width: usize) -> usize {
        let width = width.max(1);
        let mut lines = 0;

        for paragraph in text.split('\n') {
            let mut current = 0usize;
            let mut paragraph_lines = 1;
            for word in paragraph.split_whitespace() {
                let len = word.chars().count();
                if current == 0 {
                    // A word longer than the line is hard-broken
                    paragraph_lines += (len.max(1) - 1) / width;
                    current = (len - 1) % width + 1;
                } else if current + 1 + len <= width {
                    current += 1 + len;
                } else {
                    paragraph_lines += 1 + (len.max(1) - 1) / width;
                    current = (len - 1) % width + 1;
                }
            }
            lines += paragraph_lines;
        }

        lines.max(1)
    }
}

impl HeightMeasurer for MonospaceMeasurer {
    fn height_of(&self, element: &ScreenplayElement, style: &ElementStyle) -> Option<f32> {
        let line_pixels = style.line_pixels();
        if !line_pixels.is_finite() || line_pixels <= 0.0 {
            return None;
        }
        let width = self.chars_per_line(style)?;
        let lines = Self::wrapped_line_count(&element.content, width);
        Some(style.margin_top + lines as f32 * line_pixels + style.margin_bottom)
    }
}
