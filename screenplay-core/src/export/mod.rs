pub mod analytics;
pub mod serialization;
pub mod text;

// Re-export for easy access
pub use analytics::{CharacterStats, ScriptStats, TypeStats};
pub use serialization::{FormattedScript, SequentialItem, SequentialScript, FlatScript, OUTPUT_FORMATS};
pub use text::TextRenderer;
