pub mod diacritics;
pub mod espeak;
pub mod phonemes;
pub mod repair;

pub use diacritics::strip_diacritics;
pub use espeak::{CommandRunner, EspeakConverter, SystemCommandRunner};
pub use phonemes::{split_phonemes, to_phoneme_sequence, PHONE_SEPARATOR, WORD_SEPARATOR};
pub use repair::{RepairRule, RepairRules};
