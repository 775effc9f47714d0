pub mod decode;
pub mod normalize;

pub use decode::{decode_bytes, decode_file, DecodedAudio};
pub use normalize::{normalize, peak_normalize, resample, trim_silence};
