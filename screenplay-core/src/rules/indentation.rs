use crate::config::ClassificationConfig;

/// Where a line's indentation falls relative to the classification thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentationBucket {
    /// At or below the dialogue threshold
    Flush,
    /// Above the dialogue threshold, up to and including the character threshold
    Dialogue,
    /// Above the character threshold (may exceed 100%)
    Character,
}

/// Converts leading whitespace into a percentage of an assumed fixed-width line.
///
/// Expects tabs to be expanded already (see `LineSanitizer`); an unexpanded tab
/// counts as a single character.
#[derive(Debug, Clone)]
pub struct IndentationAnalyzer {
    assumed_line_width: usize,
    character_threshold: f32,
    dialogue_threshold: f32,
}

impl Default for IndentationAnalyzer {
    fn default() -> Self {
        Self::new(&ClassificationConfig::default())
    }
}

impl IndentationAnalyzer {
    pub fn new(config: &ClassificationConfig) -> Self {
        Self {
            assumed_line_width: config.assumed_line_width,
            character_threshold: config.character_indent_threshold,
            dialogue_threshold: config.dialogue_indent_threshold,
        }
    }

    pub fn leading_whitespace(line: &str) -> usize {
        line.chars().take_while(|c| c.is_whitespace()).count()
    }

    /// `(leading whitespace / assumed line width) * 100`, unbounded above
    pub fn percentage(&self, line: &str) -> f32 {
        if self.assumed_line_width == 0 {
            return 0.0;
        }
        // multiply first so exact threshold widths land exactly on the threshold
        (Self::leading_whitespace(line) as f32 * 100.0) / self.assumed_line_width as f32
    }

    pub fn bucket(&self, line: &str) -> IndentationBucket {
        let percentage = self.percentage(line);
        if percentage > self.character_threshold {
            IndentationBucket::Character
        } else if percentage > self.dialogue_threshold {
            IndentationBucket::Dialogue
        } else {
            IndentationBucket::Flush
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_of_sixty_columns() {
        let analyzer = IndentationAnalyzer::default();
        assert_eq!(analyzer.percentage("JOHN"), 0.0);
        assert_eq!(analyzer.percentage(&format!("{}JOHN", " ".repeat(30))), 50.0);
        assert_eq!(analyzer.percentage(&" ".repeat(90)), 150.0);
    }

    #[test]
    fn test_bucket_boundaries() {
        let analyzer = IndentationAnalyzer::default();
        // 9 spaces = 15% exactly, still flush
        assert_eq!(analyzer.bucket(&format!("{}x", " ".repeat(9))), IndentationBucket::Flush);
        assert_eq!(analyzer.bucket(&format!("{}x", " ".repeat(10))), IndentationBucket::Dialogue);
        // 18 spaces = 30% exactly, still dialogue
        assert_eq!(analyzer.bucket(&format!("{}x", " ".repeat(18))), IndentationBucket::Dialogue);
        assert_eq!(analyzer.bucket(&format!("{}x", " ".repeat(19))), IndentationBucket::Character);
    }

    #[test]
    fn test_counts_non_breaking_spaces() {
        assert_eq!(IndentationAnalyzer::leading_whitespace("\u{00A0}\u{00A0}  نص"), 4);
    }
}
