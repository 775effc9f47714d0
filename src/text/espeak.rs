//! espeak-ng as the grapheme-to-phoneme backend.
//!
//! espeak-ng is driven as a subprocess through [`CommandRunner`], so tests can
//! script its output without the binary installed.

use std::process::Command;

use crate::error::RecitationError;
use crate::pipeline::traits::PhonemeConverter;
use crate::text::phonemes::{PHONE_SEPARATOR, WORD_SEPARATOR};

/// Separator requested from espeak-ng between phonemes of one word.
const ESPEAK_PHONE_SEPARATOR: char = '_';
/// Primary and secondary stress marks; the grading alphabet ignores stress.
const STRESS_MARKS: [char; 2] = ['ˈ', 'ˌ'];

pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, returning stdout.
    fn run(&self, program: &str, args: &[&str]) -> Result<String, RecitationError>;
}

#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, RecitationError> {
        let output = Command::new(program).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                tracing::warn!(program, "phoneme converter binary not found");
                RecitationError::model_unavailable("phoneme converter")
            } else {
                RecitationError::conversion(format!("failed to execute {program}: {e}"))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecitationError::conversion(format!(
                "{program} failed with status {:?}: {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| RecitationError::conversion(format!("{program} emitted invalid UTF-8: {e}")))
    }
}

pub struct EspeakConverter {
    runner: Box<dyn CommandRunner>,
    program: String,
}

impl EspeakConverter {
    pub const DEFAULT_PROGRAM: &'static str = "espeak-ng";

    pub fn new() -> Self {
        Self::with_runner(Box::new(SystemCommandRunner))
    }

    pub fn with_runner(runner: Box<dyn CommandRunner>) -> Self {
        Self {
            runner,
            program: Self::DEFAULT_PROGRAM.to_string(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl Default for EspeakConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl PhonemeConverter for EspeakConverter {
    fn phonemize(&self, text: &str, language: &str) -> Result<String, RecitationError> {
        let separator = format!("--sep={ESPEAK_PHONE_SEPARATOR}");
        let args = ["-q", "--ipa", "-v", language, separator.as_str(), text];
        let raw = self.runner.run(&self.program, &args)?;
        Ok(to_delimited(&raw))
    }
}

/// Rewrite espeak-ng IPA output (`b_i_s_m a_l_l_a_h`) as `b i s m | a l l a h`.
fn to_delimited(raw: &str) -> String {
    let phone_sep = PHONE_SEPARATOR.to_string();
    let word_sep = format!("{PHONE_SEPARATOR}{WORD_SEPARATOR}{PHONE_SEPARATOR}");
    raw.split_whitespace()
        .filter_map(|word| {
            let phones: Vec<String> = word
                .split(ESPEAK_PHONE_SEPARATOR)
                .map(|phone| phone.chars().filter(|c| !STRESS_MARKS.contains(c)).collect::<String>())
                .filter(|phone| !phone.is_empty())
                .collect();
            if phones.is_empty() {
                None
            } else {
                Some(phones.join(&phone_sep))
            }
        })
        .collect::<Vec<_>>()
        .join(&word_sep)
}
