use std::io::Cursor;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::RecitationError;

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub sample_rate_hz: u32,
    /// Mono samples in `[-1, 1]`.
    pub samples: Vec<f32>,
}

impl DecodedAudio {
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate_hz == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate_hz as f32
    }
}

/// Decode a file, using its extension as a container hint.
pub fn decode_file(path: &Path) -> Result<DecodedAudio, RecitationError> {
    let bytes =
        std::fs::read(path).map_err(|e| RecitationError::audio_decode("read audio file", e))?;
    let extension = path.extension().and_then(|ext| ext.to_str());
    decode_bytes(&bytes, extension)
}

/// Decode any container and codec symphonia was built with (WAV, FLAC, MP3,
/// MP4/AAC, Ogg/Vorbis, Matroska/WebM).
///
/// `extension` (with or without the leading dot) only guides probing; the
/// container is still detected from its content.
pub fn decode_bytes(bytes: &[u8], extension: Option<&str>) -> Result<DecodedAudio, RecitationError> {
    let source = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = extension.map(|ext| ext.trim_start_matches('.')) {
        if !ext.is_empty() {
            hint.with_extension(ext);
        }
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| RecitationError::audio_decode("probe container", e))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| RecitationError::audio_decode("select track", "no audio track found"))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let mut sample_rate_hz = codec_params.sample_rate;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| RecitationError::audio_decode("open codec", e))?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(RecitationError::audio_decode("read packet", e)),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(message)) => {
                tracing::warn!(message, "skipping undecodable packet");
                continue;
            }
            Err(e) => return Err(RecitationError::audio_decode("decode packet", e)),
        };

        let spec = *decoded.spec();
        sample_rate_hz.get_or_insert(spec.rate);
        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        samples.extend(downmix(buffer.samples(), spec.channels.count())?);
    }

    let sample_rate_hz = sample_rate_hz
        .filter(|&rate| rate > 0)
        .ok_or_else(|| RecitationError::audio_decode("stream info", "unknown sample rate"))?;
    if samples.is_empty() {
        return Err(RecitationError::audio_decode(
            "decode packets",
            "no audio samples decoded",
        ));
    }

    Ok(DecodedAudio {
        sample_rate_hz,
        samples,
    })
}

/// Average interleaved channels into one.
fn downmix(interleaved: &[f32], channels: usize) -> Result<Vec<f32>, RecitationError> {
    match channels {
        0 => Err(RecitationError::audio_decode(
            "channel layout",
            "stream declares zero channels",
        )),
        1 => Ok(interleaved.to_vec()),
        n => Ok(interleaved
            .chunks_exact(n)
            .map(|frame| frame.iter().sum::<f32>() / n as f32)
            .collect()),
    }
}
