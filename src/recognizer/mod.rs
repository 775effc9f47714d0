pub mod ctc;

pub use ctc::{greedy_decode, CtcRecognizer, CtcVocabulary};
