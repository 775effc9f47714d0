use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::audio::{self, DecodedAudio};
use crate::config::EngineConfig;
use crate::error::RecitationError;
use crate::pipeline::resources::ResourceSlot;
use crate::pipeline::traits::{PhonemeConverter, Recognizer, SequenceAligner};
use crate::scoring::{self, ConfusionTable};
use crate::text::phonemes::to_phoneme_sequence;
use crate::text::repair::RepairRules;
use crate::types::AnalysisResult;

pub struct RecitationEngine {
    config: EngineConfig,
    recognizer: Arc<ResourceSlot<dyn Recognizer>>,
    converter: Arc<ResourceSlot<dyn PhonemeConverter>>,
    sequence_aligner: Box<dyn SequenceAligner>,
    confusions: ConfusionTable,
    repair_rules: RepairRules,
}

pub(crate) struct RecitationEngineParts {
    pub config: EngineConfig,
    pub recognizer: Arc<ResourceSlot<dyn Recognizer>>,
    pub converter: Arc<ResourceSlot<dyn PhonemeConverter>>,
    pub sequence_aligner: Box<dyn SequenceAligner>,
    pub confusions: ConfusionTable,
    pub repair_rules: RepairRules,
}

impl RecitationEngine {
    pub(crate) fn from_parts(parts: RecitationEngineParts) -> Self {
        Self {
            config: parts.config,
            recognizer: parts.recognizer,
            converter: parts.converter,
            sequence_aligner: parts.sequence_aligner,
            confusions: parts.confusions,
            repair_rules: parts.repair_rules,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn repair_rules(&self) -> &RepairRules {
        &self.repair_rules
    }

    /// Both the recognizer and the phoneme converter are initialized.
    pub fn is_ready(&self) -> bool {
        self.recognizer.is_ready() && self.converter.is_ready()
    }

    fn ensure_ready(&self) -> Result<(), RecitationError> {
        self.recognizer.get()?;
        self.converter.get()?;
        Ok(())
    }

    pub fn analyze_file(
        &self,
        path: &Path,
        expected_text: Option<&str>,
    ) -> Result<AnalysisResult, RecitationError> {
        self.ensure_ready()?;
        let decoded = audio::decode_file(path)?;
        self.analyze_decoded(&decoded, expected_text)
    }

    /// Analyze an uploaded file body.
    ///
    /// The bytes are spooled to a temporary file named with `file_suffix`
    /// (e.g. `.wav`); the file is removed on every return path.
    pub fn analyze_upload(
        &self,
        bytes: &[u8],
        file_suffix: &str,
        expected_text: Option<&str>,
    ) -> Result<AnalysisResult, RecitationError> {
        self.ensure_ready()?;
        let mut upload = tempfile::Builder::new()
            .prefix("recitation-")
            .suffix(file_suffix)
            .tempfile()
            .map_err(|e| RecitationError::io("create upload file", e))?;
        upload
            .write_all(bytes)
            .and_then(|()| upload.flush())
            .map_err(|e| RecitationError::io("write upload file", e))?;
        tracing::debug!(path = %upload.path().display(), bytes = bytes.len(), "upload spooled");
        self.analyze_file(upload.path(), expected_text)
    }

    pub fn analyze_samples(
        &self,
        samples: &[f32],
        sample_rate_hz: u32,
        expected_text: Option<&str>,
    ) -> Result<AnalysisResult, RecitationError> {
        if sample_rate_hz == 0 {
            return Err(RecitationError::invalid_input("sample rate must be positive"));
        }
        self.ensure_ready()?;
        let recognizer = self.recognizer.get()?;
        let normalized = audio::normalize(samples, sample_rate_hz, &self.config.audio)?;
        let raw = recognizer.transcribe(&normalized, self.config.audio.sample_rate_hz)?;
        tracing::debug!(raw_transcription = %raw, "recognizer output");
        self.grade_transcription(&raw, expected_text)
    }

    fn analyze_decoded(
        &self,
        decoded: &DecodedAudio,
        expected_text: Option<&str>,
    ) -> Result<AnalysisResult, RecitationError> {
        tracing::debug!(
            sample_rate_hz = decoded.sample_rate_hz,
            duration_secs = decoded.duration_secs(),
            "audio decoded"
        );
        self.analyze_samples(&decoded.samples, decoded.sample_rate_hz, expected_text)
    }

    /// Grade raw recognizer output against the expected text.
    pub fn grade_transcription(
        &self,
        raw_transcription: &str,
        expected_text: Option<&str>,
    ) -> Result<AnalysisResult, RecitationError> {
        let converter = self.converter.get()?;
        let expected_text = expected_text.unwrap_or(&self.config.default_expected_text);
        let language = self.config.language.as_str();

        let transcription = self.repair_rules.apply(raw_transcription);
        let expected = to_phoneme_sequence(expected_text, converter.as_ref(), language)?;
        let produced = to_phoneme_sequence(&transcription, converter.as_ref(), language)?;

        let script = self
            .sequence_aligner
            .align(expected.symbols(), produced.symbols());
        let errors = scoring::classify(&script, &self.confusions);
        let score = scoring::score(&errors, expected.len(), &self.config.scoring);

        tracing::info!(
            expected_phonemes = expected.len(),
            produced_phonemes = produced.len(),
            errors = errors.len(),
            confusions = errors.iter().filter(|e| e.is_confusion()).count(),
            score,
            "recitation graded"
        );

        Ok(AnalysisResult {
            transcription,
            phonemes: produced.text(),
            errors,
            score,
            expected_text: expected_text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Cursor;

    use super::*;
    use crate::pipeline::builder::RecitationEngineBuilder;

    struct FixedRecognizer(&'static str);

    impl Recognizer for FixedRecognizer {
        fn transcribe(&self, samples: &[f32], rate: u32) -> Result<String, RecitationError> {
            assert_eq!(rate, 16_000);
            assert!(samples.len() >= 8_000, "padding missing");
            Ok(self.0.to_string())
        }
    }

    /// Maps each known word to phonemes, one `|` between words.
    struct TableConverter(HashMap<&'static str, &'static str>);

    impl TableConverter {
        fn bismillah() -> Self {
            Self(HashMap::from([
                ("بسم", "b i s m"),
                ("الله", "a l l a h"),
                ("ٱلله", "a l l a h"),
                ("الرحمن", "a r r a ħ m a n"),
                ("ٱلرحۡمٰن", "a r r a ħ m a n"),
                ("الرهمن", "a r r a h m a n"),
                ("الرحيم", "a r r a ħ i m"),
                ("ٱلرحيم", "a r r a ħ i m"),
                ("بسۡم", "b i s m"),
            ]))
        }
    }

    impl PhonemeConverter for TableConverter {
        fn phonemize(&self, text: &str, _language: &str) -> Result<String, RecitationError> {
            text.split_whitespace()
                .map(|word| {
                    self.0.get(word).copied().ok_or_else(|| {
                        RecitationError::conversion(format!("unknown word {word}"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(|words| words.join(" | "))
        }
    }

    fn engine(transcription: &'static str) -> RecitationEngine {
        RecitationEngineBuilder::new(EngineConfig::default())
            .with_recognizer(Arc::new(FixedRecognizer(transcription)))
            .with_phoneme_converter(Arc::new(TableConverter::bismillah()))
            .build()
            .expect("build should succeed")
    }

    fn wav_bytes(samples: &[i16]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
        for &s in samples {
            writer.write_sample(s).expect("write sample");
        }
        writer.finalize().expect("finalize");
        cursor.into_inner()
    }

    fn tone() -> Vec<i16> {
        (0..8_000)
            .map(|i| ((i as f32 * 0.07).sin() * 12_000.0) as i16)
            .collect()
    }

    #[test]
    fn perfect_recitation_scores_100() {
        let result = engine("بسم الله الرحمن الرحيم")
            .grade_transcription("بسم الله الرحمن الرحيم", Some("بِسْمِ اللَّهِ الرَّحْمَنِ الرَّحِيمِ"))
            .expect("grade");
        assert!(result.errors.is_empty());
        assert_eq!(result.score, 100);
        assert_eq!(result.expected_text, "بِسْمِ اللَّهِ الرَّحْمَنِ الرَّحِيمِ");
    }

    #[test]
    fn haa_confusion_costs_fifteen() {
        let result = engine("")
            .grade_transcription("بسم الله الرهمن الرحيم", Some("بسم الله الرحمن الرحيم"))
            .expect("grade");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].is_confusion());
        assert_eq!(result.errors[0].expected_phoneme(), "ħ");
        assert_eq!(result.errors[0].got_phoneme(), "h");
        assert_eq!(result.errors[0].position(), 13);
        assert_eq!(result.score, 85);
    }

    #[test]
    fn truncated_transcription_is_repaired_before_grading() {
        let result = engine("")
            .grade_transcription("بسم الله الرحم الرحي", Some("بسم الله الرحمن الرحيم"))
            .expect("grade");
        assert_eq!(result.transcription, "بسم الله الرحمن الرحيم");
        assert_eq!(result.score, 100);
    }

    #[test]
    fn default_expected_text_is_bismillah() {
        let result = engine("")
            .grade_transcription("بسم الله الرحمن الرحيم", None)
            .expect("grade");
        assert_eq!(result.expected_text, crate::config::DEFAULT_EXPECTED_TEXT);
    }

    #[test]
    fn phonemes_field_is_space_joined_transcription_phonemes() {
        let result = engine("")
            .grade_transcription("بسم", Some("بسم"))
            .expect("grade");
        assert_eq!(result.phonemes, "b i s m");
    }

    #[test]
    fn conversion_failure_fails_whole_request() {
        let result = engine("").grade_transcription("كلمة", Some("بسم"));
        assert!(matches!(result, Err(RecitationError::Conversion { .. })));
    }

    #[test]
    fn analyze_samples_runs_full_pipeline() {
        let samples: Vec<f32> = tone().iter().map(|&s| s as f32 / 32_768.0).collect();
        let result = engine("بسم الله الرحمن الرحي")
            .analyze_samples(&samples, 16_000, Some("بسم الله الرحمن الرحيم"))
            .expect("analyze");
        assert_eq!(result.transcription, "بسم الله الرحمن الرحيم");
        assert_eq!(result.score, 100);
    }

    /// Upload tests count files in the shared temp dir.
    static UPLOAD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn analyze_upload_cleans_up_and_grades() {
        let _guard = UPLOAD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = count_upload_files();
        let result = engine("بسم الله")
            .analyze_upload(&wav_bytes(&tone()), ".wav", Some("بسم الله"))
            .expect("analyze");
        assert_eq!(result.score, 100);
        assert_eq!(count_upload_files(), before);
    }

    #[test]
    fn analyze_upload_cleans_up_on_decode_error() {
        let _guard = UPLOAD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = count_upload_files();
        let result = engine("بسم").analyze_upload(b"not audio at all", ".webm", None);
        assert!(matches!(result, Err(RecitationError::AudioDecode { .. })));
        assert_eq!(count_upload_files(), before);
    }

    #[test]
    fn missing_recognizer_is_model_unavailable() {
        let engine = RecitationEngineBuilder::new(EngineConfig::default())
            .with_phoneme_converter(Arc::new(TableConverter::bismillah()))
            .build()
            .expect("build should succeed");
        let result = engine.analyze_samples(&[0.0; 160], 16_000, None);
        assert!(matches!(result, Err(RecitationError::ModelUnavailable { .. })));
        assert!(result.is_err_and(|e| e.is_transient()));
    }

    #[test]
    fn late_installed_recognizer_is_picked_up() {
        let slot: Arc<ResourceSlot<dyn Recognizer>> =
            Arc::new(ResourceSlot::empty("speech recognizer"));
        let engine = RecitationEngineBuilder::new(EngineConfig::default())
            .with_recognizer_slot(Arc::clone(&slot))
            .with_phoneme_converter(Arc::new(TableConverter::bismillah()))
            .build()
            .expect("build should succeed");
        assert!(!engine.is_ready());
        slot.install(Arc::new(FixedRecognizer("بسم")))
            .expect("install");
        assert!(engine.is_ready());
        let samples: Vec<f32> = tone().iter().map(|&s| s as f32 / 32_768.0).collect();
        let result = engine
            .analyze_samples(&samples, 16_000, Some("بسم"))
            .expect("analyze");
        assert_eq!(result.score, 100);
    }

    #[test]
    fn zero_sample_rate_is_invalid() {
        let result = engine("بسم").analyze_samples(&[0.1], 0, None);
        assert!(matches!(result, Err(RecitationError::InvalidInput { .. })));
    }

    fn count_upload_files() -> usize {
        std::fs::read_dir(std::env::temp_dir())
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|e| e.file_name().to_string_lossy().starts_with("recitation-"))
                    .count()
            })
            .unwrap_or(0)
    }
}
