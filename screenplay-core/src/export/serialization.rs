use super::analytics::ScriptStats;
use super::text::TextRenderer;
use crate::layout::paginator::Pagination;
use crate::layout::style::StyleResolver;
use crate::rules::validation::ValidationReport;
use crate::types::*;
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: &str = "1.0";

/// Output formats accepted by [`FormattedScript::save_with_format`]
pub const OUTPUT_FORMATS: [&str; 4] = ["paginated", "sequential", "flat", "text"];

/// A classified and (usually) paginated script with everything needed to
/// render it or tell whether it is stale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedScript {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    /// SHA-256 of the source text
    pub source_hash: String,
    /// SHA-256 of the configuration used
    pub config_hash: String,
    pub elements: Vec<ScreenplayElement>,
    /// Absent when the caller chose a continuous, unpaginated flow
    pub pagination: Option<Pagination>,
    pub stats: ScriptStats,
    /// Structural findings from the validation pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}

/// Renderer-facing ordered sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequentialScript {
    pub format: String,
    pub page_count: usize,
    pub items: Vec<SequentialItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SequentialItem {
    Element {
        index: usize,
        #[serde(rename = "type")]
        element_type: ElementType,
        content: String,
        page: Option<u32>,
    },
    PageBreak { page_number: u32 },
}

/// Contents only, in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatScript {
    pub format: String,
    pub chunks: Vec<String>,
}

impl FormattedScript {
    pub fn new(
        elements: Vec<ScreenplayElement>,
        pagination: Option<Pagination>,
        source_hash: String,
        config_hash: String,
    ) -> Self {
        let stats = ScriptStats::compute(&elements, pagination.as_ref());
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            source_hash,
            config_hash,
            elements,
            pagination,
            stats,
            validation: None,
        }
    }

    pub fn with_validation(mut self, report: ValidationReport) -> Self {
        self.validation = Some(report);
        self
    }

    pub fn is_paginated(&self) -> bool {
        self.pagination.is_some()
    }

    pub fn to_sequential_format(&self) -> SequentialScript {
        let layout: Vec<LayoutItem> = match &self.pagination {
            Some(pagination) => pagination.items(),
            None => (0..self.elements.len())
                .map(|index| LayoutItem::Element { index })
                .collect(),
        };

        let items = layout
            .into_iter()
            .filter_map(|item| match item {
                LayoutItem::PageBreak(marker) => Some(SequentialItem::PageBreak {
                    page_number: marker.page_number,
                }),
                LayoutItem::Element { index } => {
                    self.elements.get(index).map(|element| SequentialItem::Element {
                        index,
                        element_type: element.element_type,
                        content: element.content.clone(),
                        page: self.pagination.as_ref().and_then(|p| p.page_of(index)),
                    })
                }
            })
            .collect();

        SequentialScript {
            format: "sequential".to_string(),
            page_count: self.stats.page_count,
            items,
        }
    }

    pub fn to_flat_format(&self) -> FlatScript {
        FlatScript {
            format: "flat".to_string(),
            chunks: self.elements.iter().map(|e| e.content.clone()).collect(),
        }
    }

    /// Serialize in one of [`OUTPUT_FORMATS`]
    pub fn render(&self, format: &str, text: &TextRenderer) -> Result<String> {
        let output = match format {
            "paginated" => serde_json::to_string_pretty(self)?,
            "sequential" => serde_json::to_string_pretty(&self.to_sequential_format())?,
            "flat" => serde_json::to_string_pretty(&self.to_flat_format())?,
            "text" => text.render(&self.elements, self.pagination.as_ref()),
            other => bail!(
                "Unknown output format '{}' (expected one of: {})",
                other,
                OUTPUT_FORMATS.join(", ")
            ),
        };
        Ok(output)
    }

    /// Render with `styles` at `content_width` pixels over `line_width` columns and write to `path`
    pub fn save_with_format(
        &self,
        path: &str,
        format: &str,
        styles: &dyn StyleResolver,
        content_width: f32,
        line_width: usize,
    ) -> Result<()> {
        let renderer = TextRenderer::new(styles, content_width, line_width);
        let output = self.render(format, &renderer)?;
        std::fs::write(path, output)?;
        Ok(())
    }

    pub fn load_from_json(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::paginator::Paginator;
    use crate::layout::style::StyleSheet;
    use crate::rules::validation::ValidationIssue;

    fn script(paginated: bool) -> FormattedScript {
        let elements = vec![
            ScreenplayElement::new(ElementType::SceneHeading, "INT. HOUSE - DAY"),
            ScreenplayElement::new(ElementType::Character, "JOHN"),
            ScreenplayElement::new(ElementType::Dialogue, "Hello?"),
        ];
        let pagination = paginated.then(|| {
            Paginator::new(100.0)
                .paginate_heights(&[60.0, 20.0, 40.0])
                .unwrap()
        });
        FormattedScript::new(elements, pagination, "src".into(), "cfg".into())
    }

    #[test]
    fn test_sequential_carries_breaks_and_pages() {
        let sequential = script(true).to_sequential_format();
        assert_eq!(sequential.page_count, 2);
        assert_eq!(sequential.items.len(), 4);
        assert!(matches!(
            sequential.items[2],
            SequentialItem::PageBreak { page_number: 2 }
        ));
        assert!(matches!(
            sequential.items[3],
            SequentialItem::Element { index: 2, page: Some(2), .. }
        ));
    }

    #[test]
    fn test_unpaginated_flow_has_no_breaks() {
        let formatted = script(false);
        assert!(!formatted.is_paginated());
        let sequential = formatted.to_sequential_format();
        assert_eq!(sequential.items.len(), 3);
        assert!(sequential
            .items
            .iter()
            .all(|item| matches!(item, SequentialItem::Element { page: None, .. })));
    }

    #[test]
    fn test_render_formats() {
        let formatted = script(true);
        let sheet = StyleSheet::default();
        let renderer = TextRenderer::new(&sheet, 600.0, 60);

        let json = formatted.render("paginated", &renderer).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["schema_version"], "1.0");
        assert_eq!(value["elements"][1]["type"], "character");

        let flat = formatted.render("flat", &renderer).unwrap();
        assert!(flat.contains("\"Hello?\""));

        let text = formatted.render("text", &renderer).unwrap();
        assert!(text.contains("INT. HOUSE - DAY"));

        assert!(formatted.render("graph", &renderer).is_err());
    }

    #[test]
    fn test_paginated_export_carries_validation() {
        let formatted = script(true).with_validation(ValidationReport {
            issues: vec![ValidationIssue::CueWithoutDialogue {
                position: 1,
                cue: "JOHN".to_string(),
            }],
            quality_score: 0.9,
            total_elements: 3,
        });
        let sheet = StyleSheet::default();
        let renderer = TextRenderer::new(&sheet, 600.0, 60);
        let json = formatted.render("paginated", &renderer).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["validation"]["issues"][0]["issue"], "cue_without_dialogue");

        let reloaded: FormattedScript = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded.validation.map(|v| v.issues.len()), Some(1));
    }

    #[test]
    fn test_save_and_reload() {
        let formatted = script(true);
        let path = std::env::temp_dir().join(format!(
            "screenplay_serialization_test_{}_{}.json",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let path = path.to_string_lossy().to_string();
        formatted
            .save_with_format(&path, "paginated", &StyleSheet::default(), 600.0, 60)
            .unwrap();
        let loaded = FormattedScript::load_from_json(&path).unwrap();
        assert_eq!(loaded.elements, formatted.elements);
        assert_eq!(loaded.pagination, formatted.pagination);
        let _ = std::fs::remove_file(&path);
    }
}
