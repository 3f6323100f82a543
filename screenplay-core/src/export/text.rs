use crate::layout::paginator::Pagination;
use crate::layout::style::{ElementStyle, StyleResolver, TextAlignment};
use crate::types::*;

/// Renders a script as monospaced plain text, one column grid per page.
///
/// Pixel indents from the style sheet are converted to columns by the ratio
/// of the content box width to `line_width`.
pub struct TextRenderer<'a> {
    styles: &'a dyn StyleResolver,
    line_width: usize,
    pixels_per_column: f32,
}

impl<'a> TextRenderer<'a> {
    pub fn new(styles: &'a dyn StyleResolver, content_width: f32, line_width: usize) -> Self {
        let line_width = line_width.max(1);
        Self {
            styles,
            line_width,
            pixels_per_column: (content_width / line_width as f32).max(f32::EPSILON),
        }
    }

    /// Render every element; page breaks become a form feed and a page number line
    pub fn render(&self, elements: &[ScreenplayElement], pagination: Option<&Pagination>) -> String {
        let mut out = String::new();
        let mut previous: Option<ElementStyle> = None;

        let items: Vec<LayoutItem> = match pagination {
            Some(pagination) => pagination.items(),
            None => (0..elements.len())
                .map(|index| LayoutItem::Element { index })
                .collect(),
        };

        for item in items {
            match item {
                LayoutItem::PageBreak(marker) => {
                    out.push('\u{000C}');
                    let number = format!("{}.", marker.page_number);
                    out.push_str(&format!("{:>width$}\n\n", number, width = self.line_width));
                    previous = None;
                }
                LayoutItem::Element { index } => {
                    let Some(element) = elements.get(index) else {
                        continue;
                    };
                    let style = self.styles.style_of(element.element_type);
                    let spaced = previous
                        .as_ref()
                        .is_some_and(|p| p.margin_bottom > 0.0 || style.margin_top > 0.0);
                    if spaced {
                        out.push('\n');
                    }
                    for line in self.render_element(element, &style) {
                        out.push_str(&line);
                        out.push('\n');
                    }
                    previous = Some(style);
                }
            }
        }

        out
    }

    fn columns(&self, pixels: f32) -> usize {
        (pixels.max(0.0) / self.pixels_per_column).round() as usize
    }

    fn render_element(&self, element: &ScreenplayElement, style: &ElementStyle) -> Vec<String> {
        let indent_start = self.columns(style.indent_start);
        let indent_end = self.columns(style.indent_end);
        let width = self
            .line_width
            .saturating_sub(indent_start + indent_end)
            .max(1);

        let content = if style.uppercase {
            element.content.to_uppercase()
        } else {
            element.content.clone()
        };

        wrap(&content, width)
            .into_iter()
            .map(|line| {
                let len = line.chars().count();
                let pad = match style.alignment {
                    TextAlignment::Start | TextAlignment::Justify => 0,
                    TextAlignment::Center => width.saturating_sub(len) / 2,
                    TextAlignment::End => width.saturating_sub(len),
                };
                format!("{}{}", " ".repeat(indent_start + pad), line)
            })
            .collect()
    }
}

/// Greedy word wrap at `width` glyphs; over-long words are hard-broken
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;
        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            if current_len > 0 && current_len + 1 + chars.len() <= width {
                current.push(' ');
                current.extend(chars);
                current_len = current.chars().count();
                continue;
            }
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
            }
            while chars.len() > width {
                let rest = chars.split_off(width);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }
            current_len = chars.len();
            current = chars.into_iter().collect();
        }
        lines.push(current);
    }

    lines
}
