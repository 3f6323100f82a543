use crate::config::{ClassificationConfig, PatternConfig};
use crate::errors::ConfigError;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

// Bidirectional control marks that editors and clipboards put in front of RTL text
const BIDI_MARKS: &[char] = &[
    '\u{200E}', '\u{200F}', '\u{061C}', '\u{FEFF}', '\u{202A}', '\u{202B}', '\u{202C}',
    '\u{202D}', '\u{202E}', '\u{2066}', '\u{2067}', '\u{2068}', '\u{2069}',
];

// Bullet glyphs removed unconditionally from the start of a line
const BULLET_GLYPHS: &[char] = &[
    '•', '·', '●', '○', '■', '□', '▪', '▫', '◦', '‣', '⁃', '◆', '◇', '►', '▶', '➤', '→', '✓',
    '✔', '∙',
];

// ASCII list markers, only removed when followed by whitespace
const ASCII_BULLETS: &[char] = &['-', '*', '+'];

const TERMINAL_PUNCTUATION: &[char] = &[
    '.', '!', '?', ',', ';', '…', '،', '؛', '؟', '"', '”', '»',
];

// "INT.", "EXT.", "INT./EXT.", "I/E", "مشهد 3", "داخلي - منزل - نهار", optionally numbered
static SCENE_KEYWORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:\d+\s*[.\-)]?\s*)?(?:int\.?\s*/\s*ext|ext\.?\s*/\s*int|i\s*/\s*e|int|ext|est|interior|exterior|establishing|المشهد|مشهد|داخلي\s*/\s*خارجي|خارجي\s*/\s*داخلي|داخلي|خارجي|داخلى|خارجى)(?:[.\s:/\-–—،]|$)",
    )
    .expect("scene keyword regex is valid")
});

// Transitions that may be followed by a target ("CUT TO: THE BEACH")
static TRANSITION_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:smash cut to|match cut to|jump cut to|cut back to|cut to|dissolve to|fade to|قطع إلى|قطع الى|قطع إلي|مزج إلى|مزج الى)(?P<rest>[\s:.].*)?$",
    )
    .expect("transition prefix regex is valid")
});

// Transitions that must make up the whole line
static TRANSITION_EXACT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:fade in|fade out|fade to black|cut|intercut|time cut|قطع|مزج|تلاشي|تلاشى|إظلام|اظلام|اختفاء تدريجي|ظهور تدريجي|نهاية)\s*[:.]?$",
    )
    .expect("transition exact regex is valid")
});

static NOTE_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:note|director'?s? note|ملاحظة المخرج|ملاحظة|ملحوظة|توجيه)\s*[:：]")
        .expect("note marker regex is valid")
});

static BASMALA_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^بسم\s+الله(?:\s+الرحمن\s+الرحيم)?$").expect("basmala regex is valid")
});

// "(V.O.)", "(CONT'D)", "(صوت)" after a name
static CUE_EXTENSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^()]{1,20}\)$").expect("cue extension regex is valid"));

/// Remove bidirectional control marks from the start of the text
pub fn strip_bidi_marks(text: &str) -> &str {
    text.trim_start_matches(|c: char| BIDI_MARKS.contains(&c))
}

pub fn is_bidi_mark(c: char) -> bool {
    BIDI_MARKS.contains(&c)
}

/// Trimmed text without leading bidi marks, the form every matcher inspects
fn normalized(text: &str) -> &str {
    strip_bidi_marks(text.trim()).trim()
}

/// Removes leading bullet or list glyphs while keeping the leading whitespace
/// that indentation analysis relies on
pub fn strip_decorative_bullets(text: &str) -> String {
    let body_start = text
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let (indent, body) = text.split_at(body_start);

    let mut rest = body;
    loop {
        let mut chars = rest.chars();
        let Some(first) = chars.next() else { break };

        if BULLET_GLYPHS.contains(&first) {
            rest = chars.as_str().trim_start();
        } else if ASCII_BULLETS.contains(&first)
            && chars.as_str().starts_with(char::is_whitespace)
        {
            rest = chars.as_str().trim_start();
        } else {
            break;
        }
    }

    if rest.len() == body.len() {
        return text.to_string();
    }
    format!("{indent}{rest}")
}

/// A prefix transition stands alone, is followed by a colon, or is written
/// in capitals. "Back to work" and "cut to the chase" in speech stay prose.
fn matches_prefix_transition(text: &str) -> bool {
    let Some(caps) = TRANSITION_PREFIX_REGEX.captures(text) else {
        return false;
    };
    let rest = caps.name("rest").map_or("", |m| m.as_str()).trim();
    if rest.is_empty() || rest == "." || rest.starts_with([':', '：']) {
        return true;
    }
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

/// Drops Arabic diacritics (harakat) and tatweel so invocation text matches
/// however it was vocalized
fn strip_arabic_marks(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\u{064B}'..='\u{0652}' | '\u{0670}' | '\u{0640}'))
        .collect()
}

/// Compile a user phrase list into a single "starts with one of these" matcher
fn compile_phrases(phrases: &[String]) -> Result<Option<Regex>, ConfigError> {
    let escaped: Vec<String> = phrases
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(regex::escape)
        .collect();
    if escaped.is_empty() {
        return Ok(None);
    }

    let pattern = format!(r"^(?:{})(?:[.\s:/\-–—،]|$)", escaped.join("|"));
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|source| ConfigError::InvalidPattern { pattern, source })
}

/// Stateless recognizers over a single line of text.
///
/// Built-in Arabic and English keywords live in shared statics; the library
/// adds whatever extra phrases the config supplies.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    extra_scene_keywords: Option<Regex>,
    extra_transitions: Option<Regex>,
    extra_note_markers: Option<Regex>,
    max_name_chars: usize,
    max_name_words: usize,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self {
            extra_scene_keywords: None,
            extra_transitions: None,
            extra_note_markers: None,
            max_name_chars: ClassificationConfig::default().max_character_name_chars,
            max_name_words: ClassificationConfig::default().max_character_name_words,
        }
    }
}

impl PatternLibrary {
    pub fn new(patterns: &PatternConfig, classification: &ClassificationConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            extra_scene_keywords: compile_phrases(&patterns.extra_scene_keywords)?,
            extra_transitions: compile_phrases(&patterns.extra_transitions)?,
            extra_note_markers: compile_phrases(&patterns.extra_note_markers)?,
            max_name_chars: classification.max_character_name_chars,
            max_name_words: classification.max_character_name_words,
        })
    }

    pub fn matches_scene_keyword(&self, text: &str) -> bool {
        let text = normalized(text);
        SCENE_KEYWORD_REGEX.is_match(text)
            || self
                .extra_scene_keywords
                .as_ref()
                .is_some_and(|re| re.is_match(text))
    }

    pub fn matches_transition(&self, text: &str) -> bool {
        let text = normalized(text);
        matches_prefix_transition(text)
            || TRANSITION_EXACT_REGEX.is_match(text)
            || self
                .extra_transitions
                .as_ref()
                .is_some_and(|re| re.is_match(text))
    }

    /// Parenthesized text or an explicit note marker. Mirrored parentheses
    /// (")text(") show up when RTL text is copied from visual-order sources.
    pub fn matches_director_note(&self, text: &str) -> bool {
        let text = normalized(text);
        let wrapped = |open: char, close: char| {
            text.chars().count() >= 2 && text.starts_with(open) && text.ends_with(close)
        };

        wrapped('(', ')')
            || wrapped(')', '(')
            || wrapped('[', ']')
            || wrapped('（', '）')
            || NOTE_MARKER_REGEX.is_match(text)
            || self
                .extra_note_markers
                .as_ref()
                .is_some_and(|re| re.is_match(text))
    }

    /// Short, unpunctuated, and uppercase wherever the script has letter case
    pub fn looks_like_character_name(&self, text: &str) -> bool {
        let mut name = normalized(text);
        name = name
            .strip_suffix(':')
            .or_else(|| name.strip_suffix('：'))
            .unwrap_or(name)
            .trim_end();
        if let Some(m) = CUE_EXTENSION_REGEX.find(name) {
            if m.start() > 0 {
                name = name[..m.start()].trim_end();
            }
        }

        if name.is_empty() || name.chars().count() > self.max_name_chars {
            return false;
        }
        if name.split_whitespace().count() > self.max_name_words {
            return false;
        }
        if name.ends_with(TERMINAL_PUNCTUATION) {
            return false;
        }
        if !name.chars().any(char::is_alphabetic) {
            return false;
        }

        !name.chars().any(char::is_lowercase)
    }

    pub fn matches_basmala(&self, text: &str) -> bool {
        let text = normalized(text);
        if text.contains('\u{FDFD}') {
            return true;
        }
        let plain = strip_arabic_marks(text);
        let plain = plain.trim_end_matches(|c: char| c.is_whitespace() || c == '.' || c == '،');
        BASMALA_REGEX.is_match(plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> PatternLibrary {
        PatternLibrary::default()
    }

    #[test]
    fn test_scene_keywords() {
        let lib = library();
        assert!(lib.matches_scene_keyword("INT. HOUSE - DAY"));
        assert!(lib.matches_scene_keyword("ext. beach - night"));
        assert!(lib.matches_scene_keyword("INT./EXT. CAR - MOVING"));
        assert!(lib.matches_scene_keyword("12. INT. KITCHEN - DAY"));
        assert!(lib.matches_scene_keyword("مشهد 1"));
        assert!(lib.matches_scene_keyword("داخلي - منزل أحمد - نهار"));
        assert!(lib.matches_scene_keyword("\u{200F}خارجي. الشارع - ليل"));
        assert!(!lib.matches_scene_keyword("INTERESTING things happen."));
        assert!(!lib.matches_scene_keyword("Extra chairs line the wall."));
        assert!(!lib.matches_scene_keyword("مشهدا رائعا"));
    }

    #[test]
    fn test_transitions() {
        let lib = library();
        assert!(lib.matches_transition("CUT TO:"));
        assert!(lib.matches_transition("FADE IN:"));
        assert!(lib.matches_transition("fade out."));
        assert!(lib.matches_transition("DISSOLVE TO: THE GARDEN"));
        assert!(lib.matches_transition("قطع إلى:"));
        assert!(lib.matches_transition("قطع"));
        assert!(!lib.matches_transition("قطع الخبز بالسكين."));
        assert!(!lib.matches_transition("Cutting vegetables, she hums."));
        assert!(lib.matches_transition("CUT TO THE BEACH"));
        assert!(lib.matches_transition("cut to: the beach"));
        assert!(!lib.matches_transition("Back to work, everyone!"));
        assert!(!lib.matches_transition("Back to back, they circle each other."));
        assert!(!lib.matches_transition("Cut to the chase, Harry."));
        assert!(!lib.matches_transition("عودة إلى البيت الآن؟ مستحيل."));
        assert!(!lib.matches_transition("انتقال إلى المدينة كان صعبا."));
        assert!(!lib.matches_transition("قطع إلى نصفين ثم أكله."));
    }

    #[test]
    fn test_director_notes() {
        let lib = library();
        assert!(lib.matches_director_note("(quietly)"));
        assert!(lib.matches_director_note("  (بهدوء)"));
        assert!(lib.matches_director_note(")بهدوء("));
        assert!(lib.matches_director_note("[beat]"));
        assert!(lib.matches_director_note("ملاحظة: الإضاءة خافتة"));
        assert!(lib.matches_director_note("Director's note: hold the shot"));
        assert!(!lib.matches_director_note("("));
        assert!(!lib.matches_director_note("He laughs (nervously) and leaves."));
    }

    #[test]
    fn test_character_names() {
        let lib = library();
        assert!(lib.looks_like_character_name("JOHN"));
        assert!(lib.looks_like_character_name("MARY JANE (V.O.)"));
        assert!(lib.looks_like_character_name("DR. SMITH"));
        assert!(lib.looks_like_character_name("أحمد:"));
        assert!(lib.looks_like_character_name("أم سعيد"));
        assert!(!lib.looks_like_character_name("John enters the room."));
        assert!(!lib.looks_like_character_name("STOP!"));
        assert!(!lib.looks_like_character_name("يدخل أحمد الغرفة."));
        assert!(!lib.looks_like_character_name("1999"));
        assert!(!lib.looks_like_character_name("THE OLD MAN AT THE END OF THE HALL"));
    }

    #[test]
    fn test_basmala() {
        let lib = library();
        assert!(lib.matches_basmala("بسم الله الرحمن الرحيم"));
        assert!(lib.matches_basmala("بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ"));
        assert!(lib.matches_basmala("\u{FDFD}"));
        assert!(!lib.matches_basmala("بسم الله بدأنا العمل."));
    }

    #[test]
    fn test_strip_decorative_bullets_keeps_indentation() {
        assert_eq!(strip_decorative_bullets("    • JOHN"), "    JOHN");
        assert_eq!(strip_decorative_bullets("- قطع إلى:"), "قطع إلى:");
        assert_eq!(strip_decorative_bullets("  ●■ text"), "  text");
        assert_eq!(strip_decorative_bullets("-- not a bullet"), "-- not a bullet");
        assert_eq!(strip_decorative_bullets("*emphasis*"), "*emphasis*");
        assert_eq!(strip_decorative_bullets(""), "");
    }

    #[test]
    fn test_extra_patterns_from_config() {
        let patterns = PatternConfig {
            extra_scene_keywords: vec!["LOCATION".to_string()],
            extra_transitions: vec!["WIPE TO".to_string()],
            extra_note_markers: vec!["SFX".to_string()],
        };
        let lib = PatternLibrary::new(&patterns, &ClassificationConfig::default()).unwrap();
        assert!(lib.matches_scene_keyword("location: warehouse"));
        assert!(lib.matches_transition("WIPE TO:"));
        assert!(lib.matches_director_note("SFX: thunder"));
    }
}
