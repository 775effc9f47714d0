pub mod alignment;
pub mod audio;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod recognizer;
pub mod scoring;
pub mod text;
pub mod types;

pub use config::{AudioConfig, EngineConfig, ScoringConfig, DEFAULT_EXPECTED_TEXT};
pub use error::RecitationError;
pub use pipeline::builder::RecitationEngineBuilder;
pub use pipeline::resources::ResourceSlot;
pub use pipeline::runtime::RecitationEngine;
pub use pipeline::traits::{AcousticModel, PhonemeConverter, Recognizer, SequenceAligner};
pub use recognizer::{CtcRecognizer, CtcVocabulary};
pub use scoring::{ConfusionPair, ConfusionTable};
pub use text::{EspeakConverter, RepairRule, RepairRules};
pub use types::{
    AnalysisResult, EditKind, EditOperation, EditScript, Grade, PhonemeSequence,
    PronunciationError, MISSING_SYMBOL, NONE_SYMBOL,
};
