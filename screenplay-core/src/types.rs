use crate::errors::ParseElementTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ===== ELEMENT TYPES =====

/// The closed set of screenplay element kinds a line can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    SceneHeading,
    Character,
    Dialogue,
    Parenthetical,
    Action,
    Transition,
    Basmala,
}

impl ElementType {
    pub const ALL: [ElementType; 7] = [
        ElementType::SceneHeading,
        ElementType::Character,
        ElementType::Dialogue,
        ElementType::Parenthetical,
        ElementType::Action,
        ElementType::Transition,
        ElementType::Basmala,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::SceneHeading => "scene_heading",
            ElementType::Character => "character",
            ElementType::Dialogue => "dialogue",
            ElementType::Parenthetical => "parenthetical",
            ElementType::Action => "action",
            ElementType::Transition => "transition",
            ElementType::Basmala => "basmala",
        }
    }

    /// Element types that belong to a speech (cue plus what is said under it)
    pub fn is_speech(&self) -> bool {
        matches!(
            self,
            ElementType::Character | ElementType::Dialogue | ElementType::Parenthetical
        )
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = ParseElementTypeError;

    /// Accepts the labels external classifiers tend to emit:
    /// `scene-heading`, `scene_heading`, `SceneHeading`, `scene header`, ...
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let normalized: String = label
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "sceneheading" | "sceneheader" | "scene" | "slugline" => Ok(ElementType::SceneHeading),
            "character" | "charactercue" | "cue" => Ok(ElementType::Character),
            "dialogue" | "dialog" => Ok(ElementType::Dialogue),
            "parenthetical" | "directornote" | "note" => Ok(ElementType::Parenthetical),
            "action" | "description" => Ok(ElementType::Action),
            "transition" => Ok(ElementType::Transition),
            "basmala" | "bismillah" | "invocation" => Ok(ElementType::Basmala),
            _ => Err(ParseElementTypeError(label.to_string())),
        }
    }
}

// ===== ELEMENTS =====

/// One classified line of the script. Content is trimmed and immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenplayElement {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub content: String,
}

impl ScreenplayElement {
    pub fn new(element_type: ElementType, content: &str) -> Self {
        Self {
            element_type,
            content: content.trim().to_string(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

// ===== CLASSIFICATION STATE =====

/// Running state threaded through one document's classification.
///
/// `in_speech` is true while the previous element belongs to a speech that
/// started with a character cue; a parenthetical only hands the next line
/// to dialogue when it sits inside such a speech.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationContext {
    pub last_element_type: Option<ElementType>,
    pub in_speech: bool,
}

impl ClassificationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context after an element of `element_type` has been emitted
    pub fn advance(self, element_type: ElementType) -> Self {
        let in_speech = match element_type {
            ElementType::Character => true,
            ElementType::Parenthetical | ElementType::Dialogue => self.in_speech,
            _ => false,
        };

        Self {
            last_element_type: Some(element_type),
            in_speech,
        }
    }

    /// True when the next line should be read as dialogue under a cue
    pub fn expects_dialogue(&self) -> bool {
        match self.last_element_type {
            Some(ElementType::Character) => true,
            Some(ElementType::Parenthetical) => self.in_speech,
            _ => false,
        }
    }
}

/// Classification label suggested by an external (AI/OCR) collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationHint {
    pub label: ElementType,
    pub confidence: f32,
}

impl ClassificationHint {
    pub fn new(label: ElementType, confidence: f32) -> Self {
        Self { label, confidence }
    }

    /// Build a hint from a free-form label as returned by an external service
    pub fn from_label(label: &str, confidence: f32) -> Result<Self, ParseElementTypeError> {
        Ok(Self::new(label.parse()?, confidence))
    }
}

// ===== PAGINATION OUTPUT =====

/// One laid-out page. Elements are referenced by index into the shared element list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,
    pub element_indices: Vec<usize>,
    /// Sum of measured heights placed on this page
    pub used_height: f32,
}

impl Page {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            element_indices: Vec::new(),
            used_height: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.element_indices.is_empty()
    }
}

/// Marker inserted before the first element of a new page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBreakMarker {
    /// Number of the page that starts after this marker
    pub page_number: u32,
    /// Index of the element that opens the new page
    pub before_element: usize,
}

/// Ordered output for the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutItem {
    Element { index: usize },
    PageBreak(PageBreakMarker),
}
