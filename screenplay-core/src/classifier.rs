use crate::config::FormatterConfig;
use crate::errors::ConfigError;
use crate::rules::indentation::{IndentationAnalyzer, IndentationBucket};
use crate::rules::patterns::PatternLibrary;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Which rule produced a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationReason {
    Basmala,
    SceneKeyword,
    TransitionKeyword,
    DirectorNote,
    FollowsCharacterCue,
    HighIndentation,
    CharacterShape,
    DialogueIndentation,
    Fallback,
    /// Adopted from an external classification hint
    ExternalHint,
}

impl ClassificationReason {
    /// Keyword and structural decisions; indentation and shape guesses are weak
    pub fn is_strong(&self) -> bool {
        matches!(
            self,
            ClassificationReason::Basmala
                | ClassificationReason::SceneKeyword
                | ClassificationReason::TransitionKeyword
                | ClassificationReason::DirectorNote
                | ClassificationReason::FollowsCharacterCue
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub element: ScreenplayElement,
    pub reason: ClassificationReason,
}

/// Deterministic, rule-based line classifier.
///
/// Pure: `(line, context) -> (classification, context)`. The classifier holds
/// only immutable pattern tables; all running state travels in the context.
#[derive(Debug, Clone, Default)]
pub struct LineClassifier {
    patterns: PatternLibrary,
    indentation: IndentationAnalyzer,
}

impl LineClassifier {
    pub fn new(config: &FormatterConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            patterns: PatternLibrary::new(&config.patterns, &config.classification)?,
            indentation: IndentationAnalyzer::new(&config.classification),
        })
    }

    pub fn patterns(&self) -> &PatternLibrary {
        &self.patterns
    }

    /// Classify one sanitized line. Never fails: anything unrecognized is `Action`.
    pub fn classify(
        &self,
        line: &str,
        context: &ClassificationContext,
    ) -> (Classification, ClassificationContext) {
        let (element_type, reason) = self.decide(line, context);
        let classification = Classification {
            element: ScreenplayElement::new(element_type, line),
            reason,
        };
        (classification, context.advance(element_type))
    }

    /// First match wins. Keyword rules beat the follows-cue rule, which beats
    /// every indentation heuristic.
    pub fn decide(
        &self,
        line: &str,
        context: &ClassificationContext,
    ) -> (ElementType, ClassificationReason) {
        let text = line.trim();

        if self.patterns.matches_basmala(text) {
            return (ElementType::Basmala, ClassificationReason::Basmala);
        }
        if self.patterns.matches_scene_keyword(text) {
            return (ElementType::SceneHeading, ClassificationReason::SceneKeyword);
        }
        if self.patterns.matches_transition(text) {
            return (ElementType::Transition, ClassificationReason::TransitionKeyword);
        }
        if self.patterns.matches_director_note(text) {
            return (ElementType::Parenthetical, ClassificationReason::DirectorNote);
        }
        if context.expects_dialogue() {
            return (ElementType::Dialogue, ClassificationReason::FollowsCharacterCue);
        }

        // Indentation is measured on the untrimmed line
        match self.indentation.bucket(line) {
            IndentationBucket::Character => {
                (ElementType::Character, ClassificationReason::HighIndentation)
            }
            _ if self.patterns.looks_like_character_name(text) => {
                (ElementType::Character, ClassificationReason::CharacterShape)
            }
            IndentationBucket::Dialogue => {
                (ElementType::Dialogue, ClassificationReason::DialogueIndentation)
            }
            IndentationBucket::Flush => (ElementType::Action, ClassificationReason::Fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_all(lines: &[&str]) -> Vec<ElementType> {
        let classifier = LineClassifier::default();
        let mut context = ClassificationContext::new();
        let mut types = Vec::new();
        for line in lines {
            let (classification, next) = classifier.classify(line, &context);
            types.push(classification.element.element_type);
            context = next;
        }
        types
    }

    #[test]
    fn test_basic_scene() {
        let types = classify_all(&[
            "INT. HOUSE - DAY",
            "John enters the room.",
            "JOHN",
            "Hello, is anyone home?",
        ]);
        assert_eq!(
            types,
            vec![
                ElementType::SceneHeading,
                ElementType::Action,
                ElementType::Character,
                ElementType::Dialogue,
            ]
        );
    }

    #[test]
    fn test_standalone_parenthetical_does_not_start_dialogue() {
        let types = classify_all(&["(quietly)", "JANE", "(whispering)", "I heard something."]);
        assert_eq!(
            types,
            vec![
                ElementType::Parenthetical,
                ElementType::Character,
                ElementType::Parenthetical,
                ElementType::Dialogue,
            ]
        );
    }

    #[test]
    fn test_keyword_beats_indentation() {
        let classifier = LineClassifier::default();
        let line = format!("{}INT. GARAGE - NIGHT", " ".repeat(30));
        let (element_type, reason) = classifier.decide(&line, &ClassificationContext::new());
        assert_eq!(element_type, ElementType::SceneHeading);
        assert_eq!(reason, ClassificationReason::SceneKeyword);
    }

    #[test]
    fn test_follows_cue_beats_indentation() {
        let classifier = LineClassifier::default();
        let context = ClassificationContext::new().advance(ElementType::Character);
        let line = format!("{}SHUT THE DOOR", " ".repeat(40));
        let (element_type, reason) = classifier.decide(&line, &context);
        assert_eq!(element_type, ElementType::Dialogue);
        assert_eq!(reason, ClassificationReason::FollowsCharacterCue);
    }

    #[test]
    fn test_keyword_after_cue_still_wins() {
        let classifier = LineClassifier::default();
        let context = ClassificationContext::new().advance(ElementType::Character);
        let (element_type, _) = classifier.decide("CUT TO:", &context);
        assert_eq!(element_type, ElementType::Transition);
    }

    #[test]
    fn test_indentation_buckets() {
        let classifier = LineClassifier::default();
        let context = ClassificationContext::new();

        let high = format!("{}someone", " ".repeat(20));
        assert_eq!(
            classifier.decide(&high, &context),
            (ElementType::Character, ClassificationReason::HighIndentation)
        );

        let middle = format!("{}well, maybe later.", " ".repeat(12));
        assert_eq!(
            classifier.decide(&middle, &context),
            (ElementType::Dialogue, ClassificationReason::DialogueIndentation)
        );

        let flush = "The wind howls outside.";
        assert_eq!(
            classifier.decide(flush, &context),
            (ElementType::Action, ClassificationReason::Fallback)
        );
    }

    #[test]
    fn test_arabic_script() {
        let types = classify_all(&[
            "بسم الله الرحمن الرحيم",
            "مشهد 1 - داخلي - منزل أحمد - نهار",
            "يجلس أحمد على الأريكة ويقرأ الجريدة.",
            "أحمد:",
            "(بتعب)",
            "لقد تأخرت كثيرا اليوم.",
            "قطع إلى:",
        ]);
        assert_eq!(
            types,
            vec![
                ElementType::Basmala,
                ElementType::SceneHeading,
                ElementType::Action,
                ElementType::Character,
                ElementType::Parenthetical,
                ElementType::Dialogue,
                ElementType::Transition,
            ]
        );
    }

    #[test]
    fn test_garbage_degrades_to_action() {
        let classifier = LineClassifier::default();
        let (element_type, reason) = classifier.decide("%%% ??? ~~~ 123", &ClassificationContext::new());
        assert_eq!(element_type, ElementType::Action);
        assert!(!reason.is_strong());
    }
}
