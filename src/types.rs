use serde::{Deserialize, Serialize};

/// Placeholder for the expected side of an insertion.
pub const NONE_SYMBOL: &str = "[none]";
/// Placeholder for the produced side of a deletion.
pub const MISSING_SYMBOL: &str = "[missing]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonemeSequence {
    symbols: Vec<String>,
    original: String,
    cleaned: String,
}

impl PhonemeSequence {
    pub(crate) fn new(symbols: Vec<String>, original: String, cleaned: String) -> Self {
        Self {
            symbols,
            original,
            cleaned,
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Text the sequence was derived from, before diacritic stripping.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn cleaned(&self) -> &str {
        &self.cleaned
    }

    /// Symbols joined by a single space.
    pub fn text(&self) -> String {
        self.symbols.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Equal,
    Substitute,
    Delete,
    Insert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOperation {
    pub kind: EditKind,
    /// Index in the expected sequence. Inserts report the index they precede.
    pub position: usize,
    pub expected: String,
    pub produced: String,
}

impl EditOperation {
    /// Number of expected symbols this operation consumes.
    pub fn expected_width(&self) -> usize {
        match self.kind {
            EditKind::Insert => 0,
            EditKind::Equal | EditKind::Substitute | EditKind::Delete => 1,
        }
    }

    pub fn produced_width(&self) -> usize {
        match self.kind {
            EditKind::Delete => 0,
            EditKind::Equal | EditKind::Substitute | EditKind::Insert => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditScript {
    pub operations: Vec<EditOperation>,
    pub expected_len: usize,
    pub produced_len: usize,
}

impl EditScript {
    pub fn differences(&self) -> impl Iterator<Item = &EditOperation> {
        self.operations
            .iter()
            .filter(|op| op.kind != EditKind::Equal)
    }

    pub fn is_exact_match(&self) -> bool {
        self.differences().next().is_none()
    }
}

/// A single non-equal edit, as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PronunciationError {
    position: usize,
    expected_phoneme: String,
    got_phoneme: String,
    is_haa_error: bool,
    description: String,
}

impl PronunciationError {
    pub(crate) fn new(
        position: usize,
        expected_phoneme: impl Into<String>,
        got_phoneme: impl Into<String>,
        is_confusion: bool,
        description: impl Into<String>,
    ) -> Self {
        Self {
            position,
            expected_phoneme: expected_phoneme.into(),
            got_phoneme: got_phoneme.into(),
            is_haa_error: is_confusion,
            description: description.into(),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn expected_phoneme(&self) -> &str {
        &self.expected_phoneme
    }

    pub fn got_phoneme(&self) -> &str {
        &self.got_phoneme
    }

    /// Set when the error is one of the tracked confusion pairs.
    pub fn is_confusion(&self) -> bool {
        self.is_haa_error
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub transcription: String,
    /// Phonemes of the (repaired) transcription, space separated.
    pub phonemes: String,
    pub errors: Vec<PronunciationError>,
    pub score: u8,
    pub expected_text: String,
}

impl AnalysisResult {
    pub fn confusion_errors(&self) -> impl Iterator<Item = &PronunciationError> {
        self.errors.iter().filter(|e| e.is_confusion())
    }

    pub fn grade(&self) -> Grade {
        Grade::assess(self.errors.len(), self.score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Perfect,
    Good,
    NeedsPractice,
}

impl Grade {
    pub const GOOD_THRESHOLD: u8 = 70;

    /// Perfect means no errors at all; the score only separates the rest.
    pub fn assess(error_count: usize, score: u8) -> Self {
        if error_count == 0 {
            Self::Perfect
        } else if score >= Self::GOOD_THRESHOLD {
            Self::Good
        } else {
            Self::NeedsPractice
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phoneme_sequence_text_joins_with_spaces() {
        let seq = PhonemeSequence::new(
            vec!["b".into(), "i".into(), "s".into(), "m".into()],
            "بِسْمِ".into(),
            "بسم".into(),
        );
        assert_eq!(seq.text(), "b i s m");
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.cleaned(), "بسم");
    }

    #[test]
    fn operation_widths() {
        let insert = EditOperation {
            kind: EditKind::Insert,
            position: 2,
            expected: NONE_SYMBOL.into(),
            produced: "c".into(),
        };
        assert_eq!(insert.expected_width(), 0);
        assert_eq!(insert.produced_width(), 1);
    }

    #[test]
    fn grade_thresholds() {
        assert_eq!(Grade::assess(0, 100), Grade::Perfect);
        assert_eq!(Grade::assess(1, 85), Grade::Good);
        assert_eq!(Grade::assess(6, 70), Grade::Good);
        assert_eq!(Grade::assess(7, 69), Grade::NeedsPractice);
        assert_eq!(Grade::assess(20, 0), Grade::NeedsPractice);
    }

    #[test]
    fn full_score_with_errors_is_not_perfect() {
        let result = AnalysisResult {
            transcription: "a b c".into(),
            phonemes: "a b c".into(),
            errors: vec![
                PronunciationError::new(0, NONE_SYMBOL, "a", false, "Added extra 'a'"),
                PronunciationError::new(0, NONE_SYMBOL, "b", false, "Added extra 'b'"),
            ],
            score: 100,
            expected_text: String::new(),
        };
        assert_eq!(result.grade(), Grade::Good);
    }

    #[test]
    fn pronunciation_error_serializes_wire_names() {
        let err = PronunciationError::new(0, "ħ", "h", true, "confused");
        let json = serde_json::to_value(&err).expect("serialize");
        assert_eq!(json["position"], 0);
        assert_eq!(json["expected_phoneme"], "ħ");
        assert_eq!(json["got_phoneme"], "h");
        assert_eq!(json["is_haa_error"], true);
        assert_eq!(json["description"], "confused");
    }
}
