use super::preprocessor::TextPreprocessor;
use anyhow::{Context, Result};
use std::path::Path;

const SUPPORTED_EXTENSIONS: [&str; 3] = ["txt", "text", "md"];

/// Plain UTF-8 text: pasted content, typed content, or `.txt` exports
#[derive(Debug, Clone, Default)]
pub struct PlainTextPreprocessor;

impl PlainTextPreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl TextPreprocessor for PlainTextPreprocessor {
    fn decode(&self, bytes: &[u8]) -> Result<String> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let text = std::str::from_utf8(bytes).context("script text is not valid UTF-8")?;
        Ok(text.to_string())
    }

    fn split_lines(&self, text: &str) -> Vec<String> {
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        if text.is_empty() {
            return Vec::new();
        }

        let mut lines = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    lines.push(std::mem::take(&mut current));
                }
                '\n' | '\u{2028}' | '\u{2029}' => lines.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        // A trailing newline does not open another line
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    fn name(&self) -> &str {
        "PlainText"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_mixed_line_endings() {
        let pre = PlainTextPreprocessor::new();
        let lines = pre.split_lines("INT. HOUSE\r\nJOHN\rHello\n\nأحمد\u{2028}مرحبا\n");
        assert_eq!(lines, vec!["INT. HOUSE", "JOHN", "Hello", "", "أحمد", "مرحبا"]);
    }

    #[test]
    fn test_decode_strips_bom() {
        let pre = PlainTextPreprocessor::new();
        let text = pre.decode("\u{FEFF}مشهد 1".as_bytes()).unwrap();
        assert_eq!(text, "مشهد 1");
        assert!(pre.decode(&[0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn test_supported_file_types() {
        let pre = PlainTextPreprocessor::new();
        assert!(pre.supports_file_type(Path::new("script.TXT")));
        assert!(pre.supports_file_type(Path::new("script")));
        assert!(!pre.supports_file_type(Path::new("script.pdf")));
    }
}
