use crate::types::{EditKind, EditScript, PronunciationError};

/// A watched pair of phonemes with the message shown for each direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionPair {
    pub first: String,
    pub second: String,
    /// Shown when `first` was expected and `second` was produced.
    pub first_as_second: String,
    /// Shown when `second` was expected and `first` was produced.
    pub second_as_first: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionTable {
    pairs: Vec<ConfusionPair>,
}

impl ConfusionTable {
    pub fn new(pairs: Vec<ConfusionPair>) -> Self {
        Self { pairs }
    }

    pub fn empty() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Description for a substitution if it hits a watched pair.
    pub fn lookup(&self, expected: &str, produced: &str) -> Option<&str> {
        self.pairs.iter().find_map(|pair| {
            if pair.first == expected && pair.second == produced {
                Some(pair.first_as_second.as_str())
            } else if pair.second == expected && pair.first == produced {
                Some(pair.second_as_first.as_str())
            } else {
                None
            }
        })
    }

    pub fn pairs(&self) -> &[ConfusionPair] {
        &self.pairs
    }
}

impl Default for ConfusionTable {
    /// ح (ħ) against ه (h).
    fn default() -> Self {
        Self::new(vec![ConfusionPair {
            first: "ħ".to_string(),
            second: "h".to_string(),
            first_as_second: "Said ه (h) instead of ح (ħ) in الرَّحۡمَٰنِ or الرَّحِيمِ"
                .to_string(),
            second_as_first: "Said ح (ħ) instead of ه (h)".to_string(),
        }])
    }
}

/// One error per non-equal operation, in script order.
pub fn classify(script: &EditScript, table: &ConfusionTable) -> Vec<PronunciationError> {
    script
        .operations
        .iter()
        .filter_map(|op| match op.kind {
            EditKind::Equal => None,
            EditKind::Substitute => Some(match table.lookup(&op.expected, &op.produced) {
                Some(description) => PronunciationError::new(
                    op.position,
                    &op.expected,
                    &op.produced,
                    true,
                    description,
                ),
                None => PronunciationError::new(
                    op.position,
                    &op.expected,
                    &op.produced,
                    false,
                    format!("Said '{}' instead of '{}'", op.produced, op.expected),
                ),
            }),
            EditKind::Delete => Some(PronunciationError::new(
                op.position,
                &op.expected,
                &op.produced,
                false,
                format!("Skipped '{}'", op.expected),
            )),
            EditKind::Insert => Some(PronunciationError::new(
                op.position,
                &op.expected,
                &op.produced,
                false,
                format!("Added extra '{}'", op.produced),
            )),
        })
        .collect()
}
