use crate::layout::paginator::Pagination;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary numbers for a formatted script
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptStats {
    pub total_elements: usize,
    pub total_words: usize,
    /// Zero when the script was not paginated
    pub page_count: usize,
    pub scene_count: usize,
    pub type_distribution: BTreeMap<ElementType, TypeStats>,
    /// Keyed by normalized cue name
    pub characters: BTreeMap<String, CharacterStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeStats {
    pub count: usize,
    pub percentage: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    /// Times the character is cued
    pub cues: usize,
    /// Words of dialogue spoken under their cues
    pub words_spoken: usize,
}

impl ScriptStats {
    pub fn compute(elements: &[ScreenplayElement], pagination: Option<&Pagination>) -> Self {
        let mut stats = ScriptStats {
            total_elements: elements.len(),
            page_count: pagination.map_or(0, |p| p.page_count()),
            ..Default::default()
        };

        let mut speaker: Option<String> = None;
        for element in elements {
            stats.total_words += element.word_count();
            stats
                .type_distribution
                .entry(element.element_type)
                .or_default()
                .count += 1;

            match element.element_type {
                ElementType::SceneHeading => {
                    stats.scene_count += 1;
                    speaker = None;
                }
                ElementType::Character => {
                    let name = cue_name(&element.content);
                    stats.characters.entry(name.clone()).or_default().cues += 1;
                    speaker = Some(name);
                }
                ElementType::Dialogue => {
                    if let Some(name) = &speaker {
                        stats.characters.entry(name.clone()).or_default().words_spoken +=
                            element.word_count();
                    }
                }
                ElementType::Parenthetical => {}
                _ => speaker = None,
            }
        }

        let total = elements.len();
        for type_stats in stats.type_distribution.values_mut() {
            type_stats.percentage = if total > 0 {
                (type_stats.count as f32 / total as f32) * 100.0
            } else {
                0.0
            };
        }

        stats
    }

    /// Characters ordered by how often they are cued, most first
    pub fn top_characters(&self, limit: usize) -> Vec<(&str, &CharacterStats)> {
        let mut ranked: Vec<(&str, &CharacterStats)> = self
            .characters
            .iter()
            .map(|(name, stats)| (name.as_str(), stats))
            .collect();
        ranked.sort_by(|a, b| b.1.cues.cmp(&a.1.cues).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }
}

/// Cue text without its colon or extension, so `JOHN (V.O.)` and `JOHN:` count as one
fn cue_name(cue: &str) -> String {
    let name = cue.trim();
    let name = name.split(['(', '（']).next().unwrap_or(name);
    name.trim()
        .trim_end_matches([':', '：'])
        .trim()
        .to_uppercase()
}
