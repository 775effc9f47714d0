pub mod classify;
pub mod score;

pub use classify::{classify, ConfusionPair, ConfusionTable};
pub use score::{score, MAX_SCORE};
