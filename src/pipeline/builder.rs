use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::RecitationError;
use crate::pipeline::defaults::BlockMatchingAligner;
use crate::pipeline::resources::ResourceSlot;
use crate::pipeline::runtime::{RecitationEngine, RecitationEngineParts};
use crate::pipeline::traits::{PhonemeConverter, Recognizer, SequenceAligner};
use crate::scoring::ConfusionTable;
use crate::text::espeak::EspeakConverter;
use crate::text::repair::RepairRules;

pub(crate) const RECOGNIZER: &str = "speech recognizer";
pub(crate) const CONVERTER: &str = "phoneme converter";

pub struct RecitationEngineBuilder {
    config: EngineConfig,
    recognizer: Option<Arc<ResourceSlot<dyn Recognizer>>>,
    converter: Option<Arc<ResourceSlot<dyn PhonemeConverter>>>,
    sequence_aligner: Option<Box<dyn SequenceAligner>>,
    confusions: Option<ConfusionTable>,
    repair_rules: Option<RepairRules>,
}

impl RecitationEngineBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            recognizer: None,
            converter: None,
            sequence_aligner: None,
            confusions: None,
            repair_rules: None,
        }
    }

    pub fn with_recognizer(mut self, recognizer: Arc<dyn Recognizer>) -> Self {
        self.recognizer = Some(Arc::new(ResourceSlot::ready(RECOGNIZER, recognizer)));
        self
    }

    /// Share a slot that is filled later, e.g. once model weights finish loading.
    pub fn with_recognizer_slot(mut self, slot: Arc<ResourceSlot<dyn Recognizer>>) -> Self {
        self.recognizer = Some(slot);
        self
    }

    pub fn with_phoneme_converter(mut self, converter: Arc<dyn PhonemeConverter>) -> Self {
        self.converter = Some(Arc::new(ResourceSlot::ready(CONVERTER, converter)));
        self
    }

    pub fn with_phoneme_converter_slot(
        mut self,
        slot: Arc<ResourceSlot<dyn PhonemeConverter>>,
    ) -> Self {
        self.converter = Some(slot);
        self
    }

    pub fn with_sequence_aligner(mut self, sequence_aligner: Box<dyn SequenceAligner>) -> Self {
        self.sequence_aligner = Some(sequence_aligner);
        self
    }

    pub fn with_confusion_table(mut self, confusions: ConfusionTable) -> Self {
        self.confusions = Some(confusions);
        self
    }

    /// Replaces the built-in rules and any rules from the config.
    pub fn with_repair_rules(mut self, repair_rules: RepairRules) -> Self {
        self.repair_rules = Some(repair_rules);
        self
    }

    pub fn build(self) -> Result<RecitationEngine, RecitationError> {
        if self.config.audio.sample_rate_hz == 0 {
            return Err(RecitationError::invalid_input(
                "audio.sample_rate_hz must be positive",
            ));
        }
        if self.config.audio.trim_hop_length == 0 || self.config.audio.trim_frame_length == 0 {
            return Err(RecitationError::invalid_input(
                "audio trim frame and hop lengths must be positive",
            ));
        }

        let repair_rules = match self.repair_rules {
            Some(rules) => {
                if !self.config.extra_repair_rules.is_empty() {
                    tracing::warn!(
                        ignored = self.config.extra_repair_rules.len(),
                        "explicit repair rules replace the configured extra rules"
                    );
                }
                rules
            }
            None => RepairRules::with_defaults(self.config.extra_repair_rules.clone())?,
        };

        let recognizer = self
            .recognizer
            .unwrap_or_else(|| Arc::new(ResourceSlot::empty(RECOGNIZER)));
        let converter = self.converter.unwrap_or_else(|| {
            Arc::new(ResourceSlot::ready(
                CONVERTER,
                Arc::new(EspeakConverter::new()) as Arc<dyn PhonemeConverter>,
            ))
        });

        Ok(RecitationEngine::from_parts(RecitationEngineParts {
            config: self.config,
            recognizer,
            converter,
            sequence_aligner: self
                .sequence_aligner
                .unwrap_or_else(|| Box::new(BlockMatchingAligner)),
            confusions: self.confusions.unwrap_or_default(),
            repair_rules,
        }))
    }
}
