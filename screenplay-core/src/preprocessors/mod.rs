//! Text Preprocessors
//!
//! This module is the boundary between raw text producers and the classifier.
//!
//! ## Architecture
//!
//! ```text
//! Source (file bytes, clipboard, OCR output)
//!     ↓
//! [TextPreprocessor]
//!     ↓
//! Raw lines (unsanitized, original order)
//!     ↓
//! [ScriptProcessor]
//!     ↓
//! ScreenplayElements
//! ```
//!
//! ## Available Preprocessors
//!
//! - `PlainTextPreprocessor` - UTF-8 plain text

pub mod preprocessor;
pub mod text;

pub use preprocessor::TextPreprocessor;
pub use text::PlainTextPreprocessor;
