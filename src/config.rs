use std::path::Path;

use serde::Deserialize;

use crate::error::RecitationError;
use crate::text::repair::RepairRule;

/// Bismillah, the phrase graded when a request names no target text.
pub const DEFAULT_EXPECTED_TEXT: &str = "بِسۡمِ ٱللَّهِ ٱلرَّحۡمَٰنِ ٱلرَّحِيمِ";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Language selector handed to the phoneme converter.
    pub language: String,
    pub default_expected_text: String,
    pub audio: AudioConfig,
    pub scoring: ScoringConfig,
    /// Appended after the built-in repair rules.
    pub extra_repair_rules: Vec<RepairRule>,
}

impl EngineConfig {
    pub const DEFAULT_LANGUAGE: &'static str = "ar";

    pub fn load(path: &Path) -> Result<Self, RecitationError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| RecitationError::io("read engine config", e))?;
        serde_json::from_str(&data).map_err(|e| RecitationError::json("parse engine config", e))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            language: Self::DEFAULT_LANGUAGE.to_string(),
            default_expected_text: DEFAULT_EXPECTED_TEXT.to_string(),
            audio: AudioConfig::default(),
            scoring: ScoringConfig::default(),
            extra_repair_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate_hz: u32,
    /// Frames quieter than this many dB below the loudest frame count as silence.
    pub trim_top_db: f32,
    pub trim_frame_length: usize,
    pub trim_hop_length: usize,
    pub peak_epsilon: f32,
    /// Zero padding appended after trimming; the recognizer drops trailing
    /// phonemes without it.
    pub trailing_padding_secs: f32,
}

impl AudioConfig {
    pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 16_000;

    pub fn trailing_padding_samples(&self) -> usize {
        (self.trailing_padding_secs.max(0.0) * self.sample_rate_hz as f32).round() as usize
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: Self::DEFAULT_SAMPLE_RATE_HZ,
            trim_top_db: 20.0,
            trim_frame_length: 2048,
            trim_hop_length: 512,
            peak_epsilon: 1e-8,
            trailing_padding_secs: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub confusion_penalty: u32,
    pub error_penalty: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            confusion_penalty: 15,
            error_penalty: 5,
        }
    }
}
