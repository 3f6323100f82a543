use crate::types::ElementType;
use serde::{Deserialize, Serialize};

/// Horizontal alignment, expressed relative to the text direction so the same
/// sheet serves right-to-left and left-to-right scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlignment {
    #[default]
    Start,
    Center,
    End,
    Justify,
}

/// Resolved visual style for one element type. Sizes are CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Multiple of `font_size`
    #[serde(default = "default_line_height")]
    pub line_height: f32,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub uppercase: bool,
    #[serde(default)]
    pub alignment: TextAlignment,
    #[serde(default)]
    pub indent_start: f32,
    #[serde(default)]
    pub indent_end: f32,
    #[serde(default)]
    pub margin_top: f32,
    #[serde(default)]
    pub margin_bottom: f32,
}

fn default_font_family() -> String {
    "Courier Prime".to_string()
}

fn default_font_size() -> f32 {
    16.0
}

fn default_line_height() -> f32 {
    1.2
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size: default_font_size(),
            line_height: default_line_height(),
            bold: false,
            italic: false,
            uppercase: false,
            alignment: TextAlignment::Start,
            indent_start: 0.0,
            indent_end: 0.0,
            margin_top: 0.0,
            margin_bottom: 0.0,
        }
    }
}

impl ElementStyle {
    /// Height of one rendered line
    pub fn line_pixels(&self) -> f32 {
        self.font_size * self.line_height
    }
}

/// Maps an element type to the style it is rendered with.
/// Used for rendering and measurement only, never for classification.
pub trait StyleResolver {
    fn style_of(&self, element_type: ElementType) -> ElementStyle;
}

/// Default resolver: one style per element type, each overridable from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSheet {
    #[serde(default = "default_basmala")]
    pub basmala: ElementStyle,
    #[serde(default = "default_scene_heading")]
    pub scene_heading: ElementStyle,
    #[serde(default = "default_action")]
    pub action: ElementStyle,
    #[serde(default = "default_character")]
    pub character: ElementStyle,
    #[serde(default = "default_parenthetical")]
    pub parenthetical: ElementStyle,
    #[serde(default = "default_dialogue")]
    pub dialogue: ElementStyle,
    #[serde(default = "default_transition")]
    pub transition: ElementStyle,
}

fn default_basmala() -> ElementStyle {
    ElementStyle {
        bold: true,
        alignment: TextAlignment::Center,
        margin_bottom: 24.0,
        ..ElementStyle::default()
    }
}

fn default_scene_heading() -> ElementStyle {
    ElementStyle {
        bold: true,
        uppercase: true,
        margin_top: 24.0,
        margin_bottom: 12.0,
        ..ElementStyle::default()
    }
}

fn default_action() -> ElementStyle {
    ElementStyle {
        margin_bottom: 12.0,
        ..ElementStyle::default()
    }
}

fn default_character() -> ElementStyle {
    ElementStyle {
        uppercase: true,
        alignment: TextAlignment::Center,
        margin_top: 12.0,
        ..ElementStyle::default()
    }
}

fn default_parenthetical() -> ElementStyle {
    ElementStyle {
        italic: true,
        indent_start: 144.0,
        indent_end: 144.0,
        ..ElementStyle::default()
    }
}

fn default_dialogue() -> ElementStyle {
    ElementStyle {
        indent_start: 96.0,
        indent_end: 96.0,
        margin_bottom: 12.0,
        ..ElementStyle::default()
    }
}

fn default_transition() -> ElementStyle {
    ElementStyle {
        uppercase: true,
        alignment: TextAlignment::End,
        margin_top: 12.0,
        margin_bottom: 12.0,
        ..ElementStyle::default()
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            basmala: default_basmala(),
            scene_heading: default_scene_heading(),
            action: default_action(),
            character: default_character(),
            parenthetical: default_parenthetical(),
            dialogue: default_dialogue(),
            transition: default_transition(),
        }
    }
}

impl StyleSheet {
    pub fn get(&self, element_type: ElementType) -> &ElementStyle {
        match element_type {
            ElementType::Basmala => &self.basmala,
            ElementType::SceneHeading => &self.scene_heading,
            ElementType::Action => &self.action,
            ElementType::Character => &self.character,
            ElementType::Parenthetical => &self.parenthetical,
            ElementType::Dialogue => &self.dialogue,
            ElementType::Transition => &self.transition,
        }
    }
}

impl StyleResolver for StyleSheet {
    fn style_of(&self, element_type: ElementType) -> ElementStyle {
        self.get(element_type).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_a_style() {
        let sheet = StyleSheet::default();
        for element_type in ElementType::ALL {
            assert!(sheet.style_of(element_type).font_size > 0.0);
        }
        assert_eq!(sheet.style_of(ElementType::Character).alignment, TextAlignment::Center);
        assert_eq!(sheet.style_of(ElementType::Transition).alignment, TextAlignment::End);
    }

    #[test]
    fn test_partial_yaml_override() {
        let yaml = "dialogue:\n  font_size: 20\n  indent_start: 50\n";
        let sheet: StyleSheet = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(sheet.dialogue.font_size, 20.0);
        assert_eq!(sheet.dialogue.indent_start, 50.0);
        // unspecified fields fall back per field, unspecified types per type
        assert_eq!(sheet.dialogue.font_family, "Courier Prime");
        assert_eq!(sheet.character, StyleSheet::default().character);
    }
}
