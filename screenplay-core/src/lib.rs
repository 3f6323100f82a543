// Screenplay Core Library
//
// Classifies raw Arabic/English screenplay lines into typed elements and lays
// them out onto fixed-size pages from externally measured heights.

pub mod types;
pub mod errors;
pub mod config;
pub mod rules;
pub mod classifier;
pub mod processor;
pub mod preprocessors;
pub mod layout;
pub mod export;
pub mod fingerprint;
pub mod pipeline;

// Re-export main types and functions for easy use
pub use types::*;
pub use errors::{ConfigError, PaginationError, ParseElementTypeError};
pub use config::FormatterConfig;
pub use classifier::{ClassificationReason, LineClassifier};
pub use processor::{HintSource, NoHints, ScriptProcessor, ScriptSession};
pub use preprocessors::{PlainTextPreprocessor, TextPreprocessor};
pub use layout::{HeightMeasurer, MonospaceMeasurer, Pagination, Paginator, StyleResolver, StyleSheet};
pub use export::{FormattedScript, ScriptStats};
pub use pipeline::{FormattingPipeline, PipelineStages};
