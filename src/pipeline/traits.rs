use candle_core::Tensor;

use crate::error::RecitationError;
use crate::types::EditScript;

/// Speech recognizer producing a best-guess transcription.
///
/// Implementations are loaded once and shared read-only between requests.
pub trait Recognizer: Send + Sync {
    fn transcribe(&self, samples: &[f32], sample_rate_hz: u32) -> Result<String, RecitationError>;
}

/// Grapheme-to-phoneme backend.
///
/// Returns phonemes separated by a single space and words separated by `|`,
/// with no syllable separators. The same text must always map to the same
/// phonemes.
pub trait PhonemeConverter: Send + Sync {
    fn phonemize(&self, text: &str, language: &str) -> Result<String, RecitationError>;
}

pub trait SequenceAligner: Send + Sync {
    fn align(&self, expected: &[String], produced: &[String]) -> EditScript;
}

/// Acoustic model emitting per-frame CTC logits, shaped `(frames, vocab)` or
/// `(1, frames, vocab)`.
pub trait AcousticModel: Send + Sync {
    fn logits(&self, normalized_audio: &[f32]) -> Result<Tensor, RecitationError>;
}
