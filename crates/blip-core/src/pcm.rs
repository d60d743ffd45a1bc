//! Peak normalization and 16-bit quantization.
//!
//! Tones are summed in floating point at a fixed amplitude, so a handful of
//! overlapping notes can exceed the signed 16-bit range. Instead of clipping
//! each sample, the whole block is scaled by `32767 / peak` when the peak is
//! above the ceiling. Below the ceiling the block is only rounded.
//!
//! Scaling per block keeps the waveform shape intact at the cost of a brief
//! loudness dip while many notes stack up.

use libm::{fabsf, roundf};

/// Largest magnitude written to the output.
pub const PCM_CEILING: f32 = 32767.0;

/// Largest absolute value in `samples`. Non-finite samples are ignored.
#[inline]
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| fabsf(*s))
        .filter(|s| s.is_finite())
        .fold(0.0, f32::max)
}

/// Gain that brings `peak` down to the ceiling, or 1.0 when it already fits.
#[inline]
pub fn normalization_gain(peak: f32) -> f32 {
    if peak > PCM_CEILING {
        PCM_CEILING / peak
    } else {
        1.0
    }
}

/// Round one scaled sample to 16-bit PCM, clamped to `±32767`.
#[inline]
pub fn quantize(sample: f32, gain: f32) -> i16 {
    let v = roundf(sample * gain);
    if v.is_nan() {
        0
    } else {
        v.clamp(-PCM_CEILING, PCM_CEILING) as i16
    }
}

/// Normalize `src` into `dst`, element by element.
///
/// Only `min(src.len(), dst.len())` samples are written.
pub fn normalize_into(src: &[f32], dst: &mut [i16]) {
    let peak = peak(src);
    if peak == 0.0 {
        let n = src.len().min(dst.len());
        dst[..n].fill(0);
        return;
    }
    let gain = normalization_gain(peak);
    for (out, &s) in dst.iter_mut().zip(src) {
        *out = quantize(s, gain);
    }
}

/// Output sample type accepted by the mixer.
///
/// The mixer always quantizes to 16-bit first; float devices receive the same
/// values rescaled to `[-1, 1)`.
pub trait PcmSample: Copy + Send + 'static {
    /// Silence.
    const SILENCE: Self;

    /// Convert a quantized 16-bit sample.
    fn from_pcm16(value: i16) -> Self;
}

impl PcmSample for i16 {
    const SILENCE: Self = 0;

    #[inline]
    fn from_pcm16(value: i16) -> Self {
        value
    }
}

impl PcmSample for f32 {
    const SILENCE: Self = 0.0;

    #[inline]
    fn from_pcm16(value: i16) -> Self {
        f32::from(value) / 32768.0
    }
}
