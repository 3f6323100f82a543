use crate::errors::ConfigError;
use crate::layout::style::StyleSheet;
use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};

// Default value functions for serde
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatterConfig {
    /// Line classification thresholds
    #[serde(default)]
    pub classification: ClassificationConfig,
    /// Extra keywords merged into the built-in pattern library
    #[serde(default)]
    pub patterns: PatternConfig,
    /// How hints from an external classifier are blended in
    #[serde(default)]
    pub hints: HintBlendingConfig,
    /// Page geometry used by the paginator
    #[serde(default)]
    pub page: PageGeometryConfig,
    /// Per-element rendering styles
    #[serde(default)]
    pub styles: StyleSheet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Width (in characters) of a standard monospaced screenplay line
    #[serde(default = "default_line_width")]
    pub assumed_line_width: usize,
    /// Spaces substituted for every tab before measuring indentation
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,
    /// Indentation percentage above which a line reads as a character cue
    #[serde(default = "default_character_threshold")]
    pub character_indent_threshold: f32,
    /// Indentation percentage above which a line reads as dialogue
    #[serde(default = "default_dialogue_threshold")]
    pub dialogue_indent_threshold: f32,
    /// Longest line (in characters) still considered a character name
    #[serde(default = "default_max_name_chars")]
    pub max_character_name_chars: usize,
    /// Most words a character name may have
    #[serde(default = "default_max_name_words")]
    pub max_character_name_words: usize,
}

fn default_line_width() -> usize {
    60
}

fn default_tab_width() -> usize {
    4
}

fn default_character_threshold() -> f32 {
    30.0
}

fn default_dialogue_threshold() -> f32 {
    15.0
}

fn default_max_name_chars() -> usize {
    30
}

fn default_max_name_words() -> usize {
    4
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            assumed_line_width: default_line_width(),
            tab_width: default_tab_width(),
            character_indent_threshold: default_character_threshold(),
            dialogue_indent_threshold: default_dialogue_threshold(),
            max_character_name_chars: default_max_name_chars(),
            max_character_name_words: default_max_name_words(),
        }
    }
}

/// User additions to the pattern library. Entries are literal phrases,
/// matched case-insensitively at the start of a line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    #[serde(default)]
    pub extra_scene_keywords: Vec<String>,
    #[serde(default)]
    pub extra_transitions: Vec<String>,
    #[serde(default)]
    pub extra_note_markers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HintBlendingConfig {
    /// Whether external hints are considered at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Minimum confidence (0.0-1.0) for a hint to replace the rule-based decision
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
    /// Allow hints to override keyword and follows-cue decisions too
    #[serde(default)]
    pub override_strong_rules: bool,
}

fn default_min_confidence() -> f32 {
    0.85
}

impl Default for HintBlendingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_confidence: default_min_confidence(),
            override_strong_rules: false,
        }
    }
}

/// Page geometry in CSS pixels (96 DPI)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGeometryConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageGeometryConfig {
    /// A4 (210mm x 297mm) with 1 inch margins
    pub fn a4() -> Self {
        Self {
            page_width: 794.0,
            page_height: 1123.0,
            margin_top: 96.0,
            margin_bottom: 96.0,
            margin_left: 96.0,
            margin_right: 96.0,
        }
    }

    /// US Letter (8.5in x 11in) with 1 inch margins
    pub fn us_letter() -> Self {
        Self {
            page_width: 816.0,
            page_height: 1056.0,
            margin_top: 96.0,
            margin_bottom: 96.0,
            margin_left: 96.0,
            margin_right: 96.0,
        }
    }

    /// Usable content height: physical height minus top and bottom margins
    pub fn available_height(&self) -> f32 {
        self.page_height - self.margin_top - self.margin_bottom
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }
}

impl Default for PageGeometryConfig {
    fn default() -> Self {
        Self::a4()
    }
}

/// Names accepted by [`FormatterConfig::preset`]
pub const PRESET_NAMES: [&str; 2] = ["a4", "us-letter"];

impl FormatterConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FormatterConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                warn!("⚠️  Failed to load config from {p} ({e}), using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Built-in page presets; style and classification settings stay at their defaults
    pub fn preset(name: &str) -> Option<Self> {
        let page = match name.to_lowercase().as_str() {
            "a4" => PageGeometryConfig::a4(),
            "us-letter" | "letter" => PageGeometryConfig::us_letter(),
            _ => return None,
        };

        Some(Self {
            page,
            ..Self::default()
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject settings the classifier or paginator cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let classification = &self.classification;
        if classification.assumed_line_width == 0 {
            return Err(ConfigError::InvalidThreshold(
                "assumed_line_width must be greater than zero".to_string(),
            ));
        }
        if !(classification.dialogue_indent_threshold >= 0.0
            && classification.dialogue_indent_threshold < classification.character_indent_threshold)
        {
            return Err(ConfigError::InvalidThreshold(format!(
                "dialogue threshold ({}) must be non-negative and below the character threshold ({})",
                classification.dialogue_indent_threshold, classification.character_indent_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.hints.min_confidence) {
            return Err(ConfigError::InvalidThreshold(format!(
                "hint min_confidence ({}) must be within 0.0-1.0",
                self.hints.min_confidence
            )));
        }

        let page = &self.page;
        let margins = [
            page.margin_top,
            page.margin_bottom,
            page.margin_left,
            page.margin_right,
        ];
        if margins.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(ConfigError::InvalidPageGeometry(
                "margins must be finite and non-negative".to_string(),
            ));
        }
        if !(page.available_height() > 0.0) || !page.available_height().is_finite() {
            return Err(ConfigError::InvalidPageGeometry(format!(
                "usable height {} must be positive (page {} - margins {} / {})",
                page.available_height(),
                page.page_height,
                page.margin_top,
                page.margin_bottom
            )));
        }
        if !(page.content_width() > 0.0) || !page.content_width().is_finite() {
            return Err(ConfigError::InvalidPageGeometry(format!(
                "content width {} must be positive",
                page.content_width()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = FormatterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.classification.assumed_line_width, 60);
        assert_eq!(config.page.available_height(), 931.0);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
classification:
  tab_width: 8
page:
  page_width: 816.0
  page_height: 1056.0
  margin_top: 72.0
  margin_bottom: 72.0
  margin_left: 96.0
  margin_right: 96.0
"#;
        let config: FormatterConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.classification.tab_width, 8);
        assert_eq!(config.classification.character_indent_threshold, 30.0);
        assert_eq!(config.page.available_height(), 912.0);
        assert!(config.hints.enabled);
    }

    #[test]
    fn test_validate_rejects_pages_without_room() {
        let mut config = FormatterConfig::default();
        config.page.margin_top = 600.0;
        config.page.margin_bottom = 600.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPageGeometry(_))
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let mut config = FormatterConfig::default();
        config.classification.dialogue_indent_threshold = 40.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_load_rejects_invalid_file_but_fallback_recovers() {
        let path = std::env::temp_dir().join(format!(
            "screenplay_config_inverted_{}.yaml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "classification:\n  character_indent_threshold: 10.0\n  dialogue_indent_threshold: 40.0\n",
        )
        .unwrap();
        let path = path.to_string_lossy().to_string();

        let error = FormatterConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidThreshold(_))
        ));

        let fallback = FormatterConfig::load_with_fallback(Some(&path));
        assert_eq!(fallback.classification.character_indent_threshold, 30.0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_presets() {
        let letter = FormatterConfig::preset("us-letter").unwrap();
        assert_eq!(letter.page.page_height, 1056.0);
        assert_eq!(FormatterConfig::preset("A4").unwrap().page, PageGeometryConfig::a4());
        assert!(FormatterConfig::preset("legal").is_none());
    }

    #[test]
    fn test_yaml_roundtrip_keeps_settings() {
        let config = FormatterConfig::preset("us-letter").unwrap();
        let yaml = config.to_yaml().unwrap();
        let parsed: FormatterConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
