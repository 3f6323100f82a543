// Preprocessor abstraction for raw text acquisition
//
// Everything upstream of classification (file decoding, clipboard payloads,
// OCR services) only has to hand over lines of plain text. The trait keeps
// those producers swappable while the classifier stays format-agnostic.

use anyhow::Result;
use std::path::Path;

/// TextPreprocessor trait - converts source bytes into raw script lines
pub trait TextPreprocessor {
    /// Step 1: Decode source bytes into text
    fn decode(&self, bytes: &[u8]) -> Result<String>;

    /// Step 2: Split text into raw lines, in their original logical order.
    /// Right-to-left content is never reordered.
    fn split_lines(&self, text: &str) -> Vec<String>;

    /// Convenience method: both steps in sequence
    fn process(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let text = self.decode(bytes)?;
        Ok(self.split_lines(&text))
    }

    /// Convenience method: process from file path
    fn process_file(&self, input: &Path) -> Result<Vec<String>> {
        let bytes = std::fs::read(input)?;
        self.process(&bytes)
    }

    /// Get preprocessor name for logging
    fn name(&self) -> &str;

    /// Check if preprocessor supports the given file type
    fn supports_file_type(&self, path: &Path) -> bool;
}
