use std::collections::HashMap;
use std::path::Path;

use candle_core::D;

use crate::config::AudioConfig;
use crate::error::RecitationError;
use crate::pipeline::traits::{AcousticModel, Recognizer};

const PAD_TOKEN: &str = "<pad>";
const WORD_DELIMITER: &str = "|";

/// CTC output vocabulary, indexed by token id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtcVocabulary {
    tokens: Vec<String>,
    blank_id: usize,
}

impl CtcVocabulary {
    /// Build from a token → id map as stored in a HuggingFace `vocab.json`.
    ///
    /// The blank is `<pad>` when present, else id 0. Ids must fall inside
    /// `0..map.len()`.
    pub fn from_map(map: HashMap<String, usize>) -> Result<Self, RecitationError> {
        let max_id = map
            .values()
            .copied()
            .max()
            .ok_or_else(|| RecitationError::invalid_input("CTC vocabulary is empty"))?;
        if max_id >= map.len() {
            return Err(RecitationError::invalid_input(format!(
                "CTC vocabulary id {max_id} out of range for {} tokens",
                map.len()
            )));
        }
        let size = max_id + 1;
        let blank_id = map.get(PAD_TOKEN).copied().unwrap_or(0);
        let mut tokens = vec![String::new(); size];
        for (token, id) in map {
            tokens[id] = token;
        }
        Ok(Self { tokens, blank_id })
    }

    pub fn load(path: &Path) -> Result<Self, RecitationError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| RecitationError::io("read vocab.json", e))?;
        let raw: HashMap<String, usize> = serde_json::from_str(&data)
            .map_err(|e| RecitationError::json("parse vocab.json", e))?;
        Self::from_map(raw)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn blank_id(&self) -> usize {
        self.blank_id
    }

    pub fn token(&self, id: usize) -> Option<&str> {
        self.tokens.get(id).map(String::as_str)
    }
}

/// Collapse repeats, drop blanks and special tokens, turn `|` into spaces.
pub fn greedy_decode(frame_ids: &[u32], vocab: &CtcVocabulary) -> String {
    let mut text = String::new();
    let mut previous: Option<u32> = None;
    for &id in frame_ids {
        if previous == Some(id) {
            continue;
        }
        previous = Some(id);
        if id as usize == vocab.blank_id() {
            continue;
        }
        match vocab.token(id as usize) {
            Some(WORD_DELIMITER) => text.push(' '),
            Some(token) if is_special(token) => {}
            Some(token) => text.push_str(token),
            None => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_special(token: &str) -> bool {
    token.is_empty() || (token.starts_with('<') && token.ends_with('>'))
}

/// Greedy CTC transcription on top of an [`AcousticModel`].
pub struct CtcRecognizer<M> {
    model: M,
    vocab: CtcVocabulary,
    expected_sample_rate_hz: u32,
}

impl<M: AcousticModel> CtcRecognizer<M> {
    pub fn new(model: M, vocab: CtcVocabulary) -> Self {
        Self {
            model,
            vocab,
            expected_sample_rate_hz: AudioConfig::DEFAULT_SAMPLE_RATE_HZ,
        }
    }

    pub fn vocab(&self) -> &CtcVocabulary {
        &self.vocab
    }
}

impl<M: AcousticModel> Recognizer for CtcRecognizer<M> {
    fn transcribe(&self, samples: &[f32], sample_rate_hz: u32) -> Result<String, RecitationError> {
        if samples.is_empty() {
            return Ok(String::new());
        }
        if sample_rate_hz != self.expected_sample_rate_hz {
            tracing::warn!(
                expected_rate_hz = self.expected_sample_rate_hz,
                actual_rate_hz = sample_rate_hz,
                "CTC recognizer expects a specific sample rate; quality may degrade"
            );
        }

        let logits = self.model.logits(&standardize(samples))?;
        let logits = if logits.rank() == 3 {
            logits
                .squeeze(0)
                .map_err(|e| RecitationError::runtime("squeeze batch", e))?
        } else {
            logits
        };
        let (frames, vocab_size) = logits
            .dims2()
            .map_err(|e| RecitationError::runtime("logits dims2", e))?;
        if vocab_size != self.vocab.len() {
            return Err(RecitationError::invalid_input(format!(
                "model emits {vocab_size} classes but vocabulary has {}",
                self.vocab.len()
            )));
        }

        let frame_ids = logits
            .argmax(D::Minus1)
            .and_then(|t| t.to_vec1::<u32>())
            .map_err(|e| RecitationError::runtime("argmax", e))?;
        let text = greedy_decode(&frame_ids, &self.vocab);
        tracing::debug!(frames, transcription = %text, "CTC greedy decode");
        Ok(text)
    }
}

/// Zero mean, unit variance, as the wav2vec2 feature extractor expects.
fn standardize(samples: &[f32]) -> Vec<f32> {
    let n = samples.len() as f64;
    let mean = samples.iter().map(|&x| x as f64).sum::<f64>() / n;
    let var = samples
        .iter()
        .map(|&x| {
            let d = x as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    let std = var.sqrt().max(1e-7);
    samples
        .iter()
        .map(|&x| ((x as f64 - mean) / std) as f32)
        .collect()
}
