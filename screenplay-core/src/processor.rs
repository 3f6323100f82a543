use crate::classifier::{Classification, ClassificationReason, LineClassifier};
use crate::config::{FormatterConfig, HintBlendingConfig};
use crate::errors::ConfigError;
use crate::rules::sanitizer::LineSanitizer;
use crate::types::*;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Supplies optional classification hints from an external (AI/OCR) collaborator,
/// keyed by the 0-based index of the raw input line
pub trait HintSource {
    fn hint_for(&self, line_index: usize, line: &str) -> Option<ClassificationHint>;
}

/// No external collaborator available
pub struct NoHints;

impl HintSource for NoHints {
    fn hint_for(&self, _line_index: usize, _line: &str) -> Option<ClassificationHint> {
        None
    }
}

impl HintSource for HashMap<usize, ClassificationHint> {
    fn hint_for(&self, line_index: usize, _line: &str) -> Option<ClassificationHint> {
        self.get(&line_index).copied()
    }
}

impl HintSource for Vec<Option<ClassificationHint>> {
    fn hint_for(&self, line_index: usize, _line: &str) -> Option<ClassificationHint> {
        self.get(line_index).copied().flatten()
    }
}

/// A classified line together with where it came from and why it got its type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedLine {
    /// Source line number (1-indexed, blank lines included)
    pub line_number: usize,
    pub element: ScreenplayElement,
    pub reason: ClassificationReason,
}

/// Drives the classifier over a whole document, carrying context line to line.
///
/// Holds no per-document state: every call starts from a fresh context, so one
/// processor can serve any number of documents, including concurrently.
#[derive(Debug, Clone)]
pub struct ScriptProcessor {
    classifier: LineClassifier,
    sanitizer: LineSanitizer,
    hints: HintBlendingConfig,
}

impl Default for ScriptProcessor {
    fn default() -> Self {
        Self {
            classifier: LineClassifier::default(),
            sanitizer: LineSanitizer::default(),
            hints: HintBlendingConfig::default(),
        }
    }
}

impl ScriptProcessor {
    pub fn new(config: &FormatterConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            classifier: LineClassifier::new(config)?,
            sanitizer: LineSanitizer::new(&config.classification),
            hints: config.hints.clone(),
        })
    }

    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    /// Classify a full document. Blank lines produce nothing and leave the context alone.
    pub fn process_script<S: AsRef<str>>(&self, lines: &[S]) -> Vec<ScreenplayElement> {
        self.classify_lines(lines, &NoHints)
            .into_iter()
            .map(|line| line.element)
            .collect()
    }

    /// Same as `process_script`, blending in external hints where policy allows
    pub fn process_script_with_hints<S: AsRef<str>>(
        &self,
        lines: &[S],
        hints: &dyn HintSource,
    ) -> Vec<ScreenplayElement> {
        self.classify_lines(lines, hints)
            .into_iter()
            .map(|line| line.element)
            .collect()
    }

    /// Classify a full document, keeping the per-line trace
    pub fn classify_lines<S: AsRef<str>>(
        &self,
        lines: &[S],
        hints: &dyn HintSource,
    ) -> Vec<ClassifiedLine> {
        let mut context = ClassificationContext::new();
        let mut classified = Vec::with_capacity(lines.len());

        for (index, raw) in lines.iter().enumerate() {
            let raw = raw.as_ref();
            let hint = hints.hint_for(index, raw);
            let (result, next) = self.classify_raw(raw, context, hint);
            context = next;

            if let Some(classification) = result {
                debug!(
                    "   line {}: {:?} ({:?})",
                    index + 1,
                    classification.element.element_type,
                    classification.reason
                );
                classified.push(ClassifiedLine {
                    line_number: index + 1,
                    element: classification.element,
                    reason: classification.reason,
                });
            }
        }

        classified
    }

    /// Single-line variant for callers that classify as the user types or pastes.
    /// Returns `None` (and the unchanged context) for blank lines.
    pub fn process_line(
        &self,
        line: &str,
        context: ClassificationContext,
    ) -> (Option<ScreenplayElement>, ClassificationContext) {
        let (result, context) = self.classify_raw(line, context, None);
        (result.map(|c| c.element), context)
    }

    /// Single-line variant with an external hint
    pub fn process_line_with_hint(
        &self,
        line: &str,
        context: ClassificationContext,
        hint: Option<ClassificationHint>,
    ) -> (Option<ScreenplayElement>, ClassificationContext) {
        let (result, context) = self.classify_raw(line, context, hint);
        (result.map(|c| c.element), context)
    }

    fn classify_raw(
        &self,
        raw: &str,
        context: ClassificationContext,
        hint: Option<ClassificationHint>,
    ) -> (Option<Classification>, ClassificationContext) {
        let line = self.sanitizer.sanitize(raw);
        if line.trim().is_empty() {
            return (None, context);
        }

        let (classification, next) = self.classifier.classify(&line, &context);
        match self.blend(&classification, hint) {
            Some(label) => {
                let blended = Classification {
                    element: ScreenplayElement::new(label, &line),
                    reason: ClassificationReason::ExternalHint,
                };
                (Some(blended), context.advance(label))
            }
            None => (Some(classification), next),
        }
    }

    /// Hint label to adopt instead of the rule-based decision, if any
    fn blend(
        &self,
        classification: &Classification,
        hint: Option<ClassificationHint>,
    ) -> Option<ElementType> {
        let hint = hint?;
        if !self.hints.enabled || !(hint.confidence >= self.hints.min_confidence) {
            return None;
        }
        if classification.reason.is_strong() && !self.hints.override_strong_rules {
            return None;
        }
        if hint.label == classification.element.element_type {
            return None;
        }
        Some(hint.label)
    }

    /// Start a stateful editing session backed by this processor
    pub fn session(&self) -> ScriptSession<'_> {
        ScriptSession::new(self)
    }
}

/// The stateful editor variant: one context and element list for the life of
/// an editing session, fed line by line as content arrives
#[derive(Debug, Clone)]
pub struct ScriptSession<'p> {
    processor: &'p ScriptProcessor,
    context: ClassificationContext,
    elements: Vec<ScreenplayElement>,
}

impl<'p> ScriptSession<'p> {
    pub fn new(processor: &'p ScriptProcessor) -> Self {
        Self {
            processor,
            context: ClassificationContext::new(),
            elements: Vec::new(),
        }
    }

    /// Classify one typed line; blank lines are ignored
    pub fn push_line(&mut self, line: &str) -> Option<&ScreenplayElement> {
        let (element, context) = self.processor.process_line(line, self.context);
        self.context = context;
        let element = element?;
        self.elements.push(element);
        self.elements.last()
    }

    /// Classify a pasted block; returns how many elements were added
    pub fn push_text(&mut self, text: &str) -> usize {
        let before = self.elements.len();
        for line in text.lines() {
            self.push_line(line);
        }
        self.elements.len() - before
    }

    pub fn elements(&self) -> &[ScreenplayElement] {
        &self.elements
    }

    pub fn context(&self) -> ClassificationContext {
        self.context
    }

    pub fn reset(&mut self) {
        self.context = ClassificationContext::new();
        self.elements.clear();
    }

    pub fn into_elements(self) -> Vec<ScreenplayElement> {
        self.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(elements: &[ScreenplayElement]) -> Vec<ElementType> {
        elements.iter().map(|e| e.element_type).collect()
    }

    #[test]
    fn test_blank_lines_are_skipped_without_touching_context() {
        let processor = ScriptProcessor::default();
        let compact = processor.process_script(&["JOHN", "Hello there."]);
        let spaced = processor.process_script(&["", "JOHN", "   ", "", "\t", "Hello there.", ""]);
        assert_eq!(compact, spaced);
        assert_eq!(types(&spaced), vec![ElementType::Character, ElementType::Dialogue]);
    }

    #[test]
    fn test_deterministic() {
        let processor = ScriptProcessor::default();
        let lines = ["INT. HOUSE - DAY", "A door creaks.", "MARY", "(whispering)", "Who's there?"];
        assert_eq!(processor.process_script(&lines), processor.process_script(&lines));
    }

    #[test]
    fn test_classify_lines_keeps_source_line_numbers() {
        let processor = ScriptProcessor::default();
        let traced = processor.classify_lines(&["INT. HOUSE - DAY", "", "JOHN"], &NoHints);
        assert_eq!(traced.len(), 2);
        assert_eq!(traced[0].line_number, 1);
        assert_eq!(traced[1].line_number, 3);
        assert_eq!(traced[1].reason, ClassificationReason::CharacterShape);
    }

    #[test]
    fn test_transition_words_in_speech_stay_dialogue() {
        let processor = ScriptProcessor::default();
        let elements =
            processor.process_script(&["JOHN", "(sighing)", "Back to work, everyone!"]);
        assert_eq!(
            types(&elements),
            vec![ElementType::Character, ElementType::Parenthetical, ElementType::Dialogue]
        );

        let elements =
            processor.process_script(&["INT. GYM - DAY", "Back to back, they circle each other."]);
        assert_eq!(types(&elements), vec![ElementType::SceneHeading, ElementType::Action]);

        let elements = processor.process_script(&["أحمد:", "عودة إلى البيت الآن؟ مستحيل."]);
        assert_eq!(types(&elements), vec![ElementType::Character, ElementType::Dialogue]);
    }

    #[test]
    fn test_tabs_feed_indentation() {
        let processor = ScriptProcessor::default();
        // 5 tabs = 20 spaces = 33% of the line
        let elements = processor.process_script(&["\t\t\t\t\tsomebody"]);
        assert_eq!(types(&elements), vec![ElementType::Character]);
    }

    #[test]
    fn test_process_line_threads_context() {
        let processor = ScriptProcessor::default();
        let context = ClassificationContext::new();

        let (element, context) = processor.process_line("JOHN", context);
        assert_eq!(element.unwrap().element_type, ElementType::Character);

        let (element, same) = processor.process_line("   ", context);
        assert!(element.is_none());
        assert_eq!(same, context);

        let (element, _) = processor.process_line("Hi.", same);
        assert_eq!(element.unwrap().element_type, ElementType::Dialogue);
    }

    #[test]
    fn test_confident_hint_replaces_weak_decision() {
        let processor = ScriptProcessor::default();
        let mut hints: HashMap<usize, ClassificationHint> = HashMap::new();
        hints.insert(0, ClassificationHint::new(ElementType::Transition, 0.95));
        hints.insert(1, ClassificationHint::new(ElementType::Character, 0.5));

        let elements =
            processor.process_script_with_hints(&["Smash to white.", "He falls asleep."], &hints);
        assert_eq!(types(&elements), vec![ElementType::Transition, ElementType::Action]);
    }

    #[test]
    fn test_hint_cannot_override_keyword_by_default() {
        let processor = ScriptProcessor::default();
        let hints = vec![Some(ClassificationHint::new(ElementType::Action, 0.99))];
        let elements = processor.process_script_with_hints(&["INT. HOUSE - DAY"], &hints);
        assert_eq!(types(&elements), vec![ElementType::SceneHeading]);

        let mut config = FormatterConfig::default();
        config.hints.override_strong_rules = true;
        let permissive = ScriptProcessor::new(&config).unwrap();
        let elements = permissive.process_script_with_hints(&["INT. HOUSE - DAY"], &hints);
        assert_eq!(types(&elements), vec![ElementType::Action]);
    }

    #[test]
    fn test_adopted_hint_drives_context() {
        let processor = ScriptProcessor::default();
        let hints = vec![Some(ClassificationHint::new(ElementType::Character, 0.9)), None];
        let elements = processor.process_script_with_hints(&["the stranger", "Leave now."], &hints);
        assert_eq!(types(&elements), vec![ElementType::Character, ElementType::Dialogue]);
    }

    #[test]
    fn test_labelled_hints_from_external_service() {
        let processor = ScriptProcessor::default();
        let hint = ClassificationHint::from_label("scene-heading", 0.97).unwrap();
        let context = ClassificationContext::new();

        let (element, context) =
            processor.process_line_with_hint("The rooftop, at dawn", context, Some(hint));
        assert_eq!(element.unwrap().element_type, ElementType::SceneHeading);
        assert_eq!(context.last_element_type, Some(ElementType::SceneHeading));

        assert!(ClassificationHint::from_label("montage", 0.99).is_err());
    }

    #[test]
    fn test_disabled_blending_ignores_hints() {
        let mut config = FormatterConfig::default();
        config.hints.enabled = false;
        let processor = ScriptProcessor::new(&config).unwrap();
        let hints = vec![Some(ClassificationHint::new(ElementType::Transition, 1.0))];
        let elements = processor.process_script_with_hints(&["Smash to white."], &hints);
        assert_eq!(types(&elements), vec![ElementType::Action]);
    }

    #[test]
    fn test_session_accumulates_pastes() {
        let processor = ScriptProcessor::default();
        let mut session = processor.session();

        assert_eq!(session.push_text("INT. CAFE - NIGHT\n\nSARA\n"), 2);
        let element = session.push_line("Coffee, please.").unwrap();
        assert_eq!(element.element_type, ElementType::Dialogue);
        assert_eq!(session.elements().len(), 3);

        session.reset();
        assert!(session.elements().is_empty());
        assert_eq!(session.context(), ClassificationContext::new());
    }
}
