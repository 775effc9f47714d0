use crate::config::ScoringConfig;
use crate::types::PronunciationError;

pub const MAX_SCORE: u8 = 100;

/// Reduce an error list to a score in `[0, 100]`.
///
/// Nothing to recite means nothing to penalize, so an empty expected
/// sequence always scores full marks.
pub fn score(errors: &[PronunciationError], expected_len: usize, config: &ScoringConfig) -> u8 {
    if expected_len == 0 {
        return MAX_SCORE;
    }
    let penalty = errors.iter().fold(0u32, |acc, error| {
        let weight = if error.is_confusion() {
            config.confusion_penalty
        } else {
            config.error_penalty
        };
        acc.saturating_add(weight)
    });
    u32::from(MAX_SCORE).saturating_sub(penalty) as u8
}
