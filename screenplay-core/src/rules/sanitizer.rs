use super::patterns::{is_bidi_mark, strip_decorative_bullets};
use crate::config::ClassificationConfig;

/// Normalizes one raw line before classification.
///
/// Leading whitespace survives (it is a classification signal); everything
/// that would distort it is normalized first.
#[derive(Debug, Clone)]
pub struct LineSanitizer {
    tab: String,
}

impl Default for LineSanitizer {
    fn default() -> Self {
        Self::new(&ClassificationConfig::default())
    }
}

impl LineSanitizer {
    pub fn new(config: &ClassificationConfig) -> Self {
        Self {
            tab: " ".repeat(config.tab_width),
        }
    }

    pub fn sanitize(&self, raw: &str) -> String {
        let expanded = raw.replace('\t', &self.tab);

        // Leading run: spaces are unified, bidi marks dropped
        let mut line = String::with_capacity(expanded.len());
        let mut in_leading_run = true;
        for c in expanded.chars() {
            if in_leading_run {
                if is_bidi_mark(c) {
                    continue;
                }
                if c.is_whitespace() {
                    line.push(' ');
                    continue;
                }
                in_leading_run = false;
            }
            line.push(c);
        }

        let line = strip_decorative_bullets(&line);
        line.trim_end().to_string()
    }
}
