use crate::layout::paginator::Pagination;
use crate::types::*;
use log::{info, warn};
use serde::{Deserialize, Serialize};

// ScriptValidator - structural consistency checks over classified elements.
// Pure reporting: elements are never changed.
pub struct ScriptValidator;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub quality_score: f32,
    pub total_elements: usize,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// A character cue that nothing is said under
    CueWithoutDialogue { position: usize, cue: String },
    /// Dialogue outside of any speech
    DialogueWithoutCue {
        position: usize,
        text_preview: String,
    },
    /// The script never names a scene
    MissingSceneHeading,
    /// A cue sitting at the bottom of a page while its lines start the next one
    StrandedCue { position: usize, page: u32 },
}

impl Default for ScriptValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(
        &self,
        elements: &[ScreenplayElement],
        pagination: Option<&Pagination>,
    ) -> ValidationReport {
        info!("🔍 Validating {} elements for structural consistency", elements.len());

        let mut issues = Vec::new();
        self.validate_speeches(elements, &mut issues);
        self.validate_scene_presence(elements, &mut issues);
        if let Some(pagination) = pagination {
            self.validate_page_ends(elements, pagination, &mut issues);
        }

        let total_elements = elements.len();
        let quality_score = if total_elements == 0 {
            1.0
        } else {
            (1.0 - (issues.len() as f32 / total_elements as f32)).max(0.0)
        };

        let report = ValidationReport {
            issues,
            quality_score,
            total_elements,
        };
        self.log_report(&report);
        report
    }

    fn validate_speeches(&self, elements: &[ScreenplayElement], issues: &mut Vec<ValidationIssue>) {
        let mut context = ClassificationContext::new();

        for (position, element) in elements.iter().enumerate() {
            match element.element_type {
                ElementType::Character => {
                    let spoken = elements[position + 1..]
                        .iter()
                        .take_while(|next| next.element_type == ElementType::Parenthetical)
                        .count();
                    let followed_by_dialogue = elements
                        .get(position + 1 + spoken)
                        .is_some_and(|next| next.element_type == ElementType::Dialogue);
                    if !followed_by_dialogue {
                        issues.push(ValidationIssue::CueWithoutDialogue {
                            position,
                            cue: element.content.clone(),
                        });
                    }
                }
                ElementType::Dialogue if !context.in_speech => {
                    issues.push(ValidationIssue::DialogueWithoutCue {
                        position,
                        text_preview: element.content.chars().take(50).collect(),
                    });
                }
                _ => {}
            }
            context = context.advance(element.element_type);
        }
    }

    fn validate_scene_presence(
        &self,
        elements: &[ScreenplayElement],
        issues: &mut Vec<ValidationIssue>,
    ) {
        let has_scene = elements
            .iter()
            .any(|e| e.element_type == ElementType::SceneHeading);
        if !elements.is_empty() && !has_scene {
            issues.push(ValidationIssue::MissingSceneHeading);
        }
    }

    fn validate_page_ends(
        &self,
        elements: &[ScreenplayElement],
        pagination: &Pagination,
        issues: &mut Vec<ValidationIssue>,
    ) {
        // The last page has nothing after it to be stranded from
        let count = pagination.pages.len().saturating_sub(1);
        for page in pagination.pages.iter().take(count) {
            let Some(&last) = page.element_indices.last() else {
                continue;
            };
            let is_cue = elements
                .get(last)
                .is_some_and(|e| e.element_type == ElementType::Character);
            if is_cue {
                issues.push(ValidationIssue::StrandedCue {
                    position: last,
                    page: page.number,
                });
            }
        }
    }

    fn log_report(&self, report: &ValidationReport) {
        if report.is_clean() {
            info!("   ✅ No structural issues found");
            return;
        }

        warn!(
            "   ⚠️  {} structural issues (quality score {:.2})",
            report.issues.len(),
            report.quality_score
        );
        for issue in &report.issues {
            match issue {
                ValidationIssue::CueWithoutDialogue { position, cue } => {
                    warn!("      element {position}: cue '{cue}' has no dialogue");
                }
                ValidationIssue::DialogueWithoutCue {
                    position,
                    text_preview,
                } => {
                    warn!("      element {position}: dialogue without a cue: '{text_preview}'");
                }
                ValidationIssue::MissingSceneHeading => {
                    warn!("      script has no scene heading");
                }
                ValidationIssue::StrandedCue { position, page } => {
                    warn!("      element {position}: cue stranded at the bottom of page {page}");
                }
            }
        }
    }
}
