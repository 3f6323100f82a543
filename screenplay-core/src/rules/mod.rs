// Line-level rules used by the classifier and the pipeline:
// - patterns.rs: keyword and shape recognizers (Arabic and English)
// - indentation.rs: leading whitespace as a percentage of a fixed-width line
// - sanitizer.rs: tab expansion, bidi mark and bullet removal
// - validation.rs: structural checks over the classified script

pub mod indentation;
pub mod patterns;
pub mod sanitizer;
pub mod validation;

pub use indentation::{IndentationAnalyzer, IndentationBucket};
pub use patterns::PatternLibrary;
pub use sanitizer::LineSanitizer;
pub use validation::{ScriptValidator, ValidationIssue, ValidationReport};
