//! Targeted fixes for recognizer output that cuts off the end of a phrase.
//!
//! Rules run in order over the trimmed transcription. Each rule is a regex
//! with a replacement template and an optional guard substring: when the
//! guard already occurs in the text the rule is skipped. A matching rule is
//! reapplied until the text stops changing, so back-to-back occurrences
//! that share a separator are all rewritten. A rule set is expected to be
//! idempotent; the built-in one is.

use regex_lite::Regex;
use serde::Deserialize;

use crate::error::RecitationError;

/// Upper bound on passes of a single rule over the text.
const MAX_RULE_PASSES: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepairRule {
    pub name: String,
    pub pattern: String,
    /// Replacement template; `$1`, `${name}` expand capture groups.
    pub replacement: String,
    #[serde(default)]
    pub unless_contains: Option<String>,
}

impl RepairRule {
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            replacement: replacement.into(),
            unless_contains: None,
        }
    }

    pub fn unless_contains(mut self, guard: impl Into<String>) -> Self {
        self.unless_contains = Some(guard.into());
        self
    }
}

/// Rules for "بسم الله الرحمن الرحيم" as recognized by the Arabic wav2vec2 model.
pub fn bismillah_rules() -> Vec<RepairRule> {
    vec![
        // الرحيم loses its final meem
        RepairRule::new("rahim-final-meem", "الرحي$", "الرحيم"),
        // الرحمن loses its final noon and collides with الرحم
        RepairRule::new("rahman-final-noon", r"(^|\s)الرحم(\s)", "${1}الرحمن${2}")
            .unless_contains("الرحمن"),
        RepairRule::new("rahman-rahim-suffix", "الرحمن الرحي$", "الرحمن الرحيم"),
    ]
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: RepairRule,
    regex: Regex,
}

#[derive(Debug, Clone)]
pub struct RepairRules {
    rules: Vec<CompiledRule>,
}

impl RepairRules {
    pub fn new(rules: Vec<RepairRule>) -> Result<Self, RecitationError> {
        let rules = rules
            .into_iter()
            .map(|rule| {
                let regex = Regex::new(&rule.pattern).map_err(|e| {
                    RecitationError::invalid_input(format!(
                        "repair rule `{}` has an invalid pattern: {e}",
                        rule.name
                    ))
                })?;
                Ok(CompiledRule { rule, regex })
            })
            .collect::<Result<Vec<_>, RecitationError>>()?;
        Ok(Self { rules })
    }

    /// Built-in rules followed by `extra`.
    pub fn with_defaults(extra: Vec<RepairRule>) -> Result<Self, RecitationError> {
        let mut rules = bismillah_rules();
        rules.extend(extra);
        Self::new(rules)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Built-in bismillah rules only.
    pub fn bismillah() -> Result<Self, RecitationError> {
        Self::new(bismillah_rules())
    }

    pub fn apply(&self, text: &str) -> String {
        let mut text = text.trim().to_string();
        for CompiledRule { rule, regex } in &self.rules {
            if let Some(guard) = &rule.unless_contains {
                if text.contains(guard.as_str()) {
                    continue;
                }
            }
            let before = text.clone();
            for _ in 0..MAX_RULE_PASSES {
                if !regex.is_match(&text) {
                    break;
                }
                let repaired = regex
                    .replace_all(&text, rule.replacement.as_str())
                    .into_owned();
                if repaired == text {
                    break;
                }
                text = repaired;
            }
            if text != before {
                tracing::debug!(rule = %rule.name, before = %before, after = %text, "transcription repaired");
            }
        }
        text
    }
}
