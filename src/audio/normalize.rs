use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::config::AudioConfig;
use crate::error::RecitationError;

/// Power floor used when converting frame energy to decibels.
const POWER_FLOOR: f64 = 1e-10;
/// Frames fed to the resampler per call.
const RESAMPLE_CHUNK: usize = 1024;

/// Prepare a decoded waveform for the recognizer.
///
/// Resample, trim silence at both ends, scale the peak to ~1.0 and append
/// trailing zero padding, in that order.
pub fn normalize(
    samples: &[f32],
    source_rate_hz: u32,
    config: &AudioConfig,
) -> Result<Vec<f32>, RecitationError> {
    let resampled = resample(samples, source_rate_hz, config.sample_rate_hz)?;
    let trimmed = trim_silence(
        &resampled,
        config.trim_top_db,
        config.trim_frame_length,
        config.trim_hop_length,
    );
    let mut out = peak_normalize(trimmed, config.peak_epsilon);
    let padding = config.trailing_padding_samples();
    out.resize(out.len() + padding, 0.0);

    tracing::debug!(
        source_rate_hz,
        input_samples = samples.len(),
        resampled_samples = resampled.len(),
        trimmed_samples = trimmed.len(),
        output_samples = out.len(),
        "audio normalized"
    );
    Ok(out)
}

/// Band-limited sinc resampling of mono audio.
///
/// The output is aligned with the input (resampler delay removed) and holds
/// `ceil(len * to_rate / from_rate)` samples.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, RecitationError> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }
    if from_rate == 0 || to_rate == 0 {
        return Err(RecitationError::invalid_input("sample rates must be positive"));
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let ratio = f64::from(to_rate) / f64::from(from_rate);
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, RESAMPLE_CHUNK, 1)
        .map_err(|e| RecitationError::runtime("create resampler", e))?;

    let expected_len = (samples.len() as u64 * u64::from(to_rate)).div_ceil(u64::from(from_rate)) as usize;
    let delay = resampler.output_delay();
    let mut output = Vec::with_capacity(expected_len + delay + RESAMPLE_CHUNK);

    let mut chunks = samples.chunks(RESAMPLE_CHUNK);
    let mut input = vec![vec![0.0f32; RESAMPLE_CHUNK]];
    while output.len() < expected_len + delay {
        let frame = &mut input[0];
        frame.fill(0.0);
        // Past the end, zeros flush the filter tail out.
        if let Some(chunk) = chunks.next() {
            frame[..chunk.len()].copy_from_slice(chunk);
        }
        let processed = resampler
            .process(&input, None)
            .map_err(|e| RecitationError::runtime("resample chunk", e))?;
        if let Some(channel) = processed.first() {
            output.extend_from_slice(channel);
        }
    }

    Ok(output[delay..delay + expected_len].to_vec())
}

/// Cut leading and trailing frames quieter than `top_db` below the loudest frame.
///
/// Frames are centered on multiples of `hop_length` and zero padded at the
/// edges. Input with no energy at all is returned unchanged.
pub fn trim_silence(
    samples: &[f32],
    top_db: f32,
    frame_length: usize,
    hop_length: usize,
) -> &[f32] {
    if samples.is_empty() || frame_length == 0 || hop_length == 0 {
        return samples;
    }

    let powers = frame_powers(samples, frame_length, hop_length);
    let peak = powers.iter().copied().fold(0.0f64, f64::max);
    if peak <= POWER_FLOOR {
        return samples;
    }

    let threshold_db = -f64::from(top_db);
    let reference_db = 10.0 * peak.max(POWER_FLOOR).log10();
    let is_loud = |p: f64| 10.0 * p.max(POWER_FLOOR).log10() - reference_db > threshold_db;

    let first = powers.iter().position(|&p| is_loud(p));
    let last = powers.iter().rposition(|&p| is_loud(p));
    match (first, last) {
        (Some(first), Some(last)) => {
            let start = (first * hop_length).min(samples.len());
            let end = ((last + 1) * hop_length).min(samples.len());
            &samples[start..end.max(start)]
        }
        _ => samples,
    }
}

/// Mean square per centered frame.
fn frame_powers(samples: &[f32], frame_length: usize, hop_length: usize) -> Vec<f64> {
    let half = frame_length / 2;
    let frame_count = 1 + samples.len() / hop_length;

    (0..frame_count)
        .map(|t| {
            let center = t * hop_length;
            let lo = center.saturating_sub(half);
            let hi = (center + frame_length - half).min(samples.len());
            let energy: f64 = samples
                .get(lo..hi)
                .unwrap_or(&[])
                .iter()
                .map(|&x| f64::from(x) * f64::from(x))
                .sum();
            energy / frame_length as f64
        })
        .collect()
}

/// Divide by the peak magnitude plus `epsilon`.
pub fn peak_normalize(samples: &[f32], epsilon: f32) -> Vec<f32> {
    let peak = samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    let denom = peak + epsilon;
    samples.iter().map(|&x| x / denom).collect()
}
