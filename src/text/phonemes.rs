use crate::error::RecitationError;
use crate::pipeline::traits::PhonemeConverter;
use crate::text::diacritics::strip_diacritics;
use crate::types::PhonemeSequence;

/// Separator between phonemes in converter output.
pub const PHONE_SEPARATOR: char = ' ';
/// Separator between words in converter output.
pub const WORD_SEPARATOR: char = '|';

/// Flatten delimited converter output into phoneme symbols.
///
/// Word markers are dropped whether they stand alone or are glued to a
/// neighbouring phoneme.
pub fn split_phonemes(delimited: &str) -> Vec<String> {
    delimited
        .split(WORD_SEPARATOR)
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

pub fn to_phoneme_sequence(
    text: &str,
    converter: &dyn PhonemeConverter,
    language: &str,
) -> Result<PhonemeSequence, RecitationError> {
    let cleaned = strip_diacritics(text);
    let symbols = if cleaned.trim().is_empty() {
        Vec::new()
    } else {
        split_phonemes(&converter.phonemize(&cleaned, language)?)
    };
    tracing::debug!(
        language,
        cleaned = %cleaned,
        phoneme_count = symbols.len(),
        "text converted to phonemes"
    );
    Ok(PhonemeSequence::new(symbols, text.to_string(), cleaned))
}
