//! Engine construction parameters.

use blip_core::{PhaseMode, Waveform};

use crate::error::{Result, SynthError};

/// Default output rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
/// Default number of resident notes.
pub const DEFAULT_POOL_CAPACITY: usize = 128;
/// Default fade-out after a note's nominal end, in seconds.
pub const DEFAULT_FADE_OUT_SECS: f64 = 0.05;
/// Default per-note peak amplitude in 16-bit PCM units.
pub const DEFAULT_AMPLITUDE: f32 = 10000.0;
/// Default largest block the mixer renders in one pass.
pub const DEFAULT_MAX_BLOCK_FRAMES: usize = 512;

/// What to do with a note whose start time has already passed when the mixer
/// first sees it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LatePolicy {
    /// Move the note to the current position and play it in full.
    #[default]
    Restart,
    /// Keep the original timing and play whatever is left of it.
    Truncate,
    /// Drop it.
    Skip,
}

/// How `stop_all` silences the pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StopMode {
    /// Sustaining notes enter their fade immediately; pending notes are dropped.
    #[default]
    Fade,
    /// Clear the pool on the spot.
    Immediate,
}

/// Parameters injected into a [`Mixer`](crate::Mixer) at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineParams {
    /// Output rate in Hz.
    pub sample_rate: u32,
    /// Interleaved output channels; the mono mix is copied to each.
    pub channels: u16,
    /// Maximum number of resident notes.
    pub pool_capacity: usize,
    /// Fade-out length in seconds.
    pub fade_out_secs: f64,
    /// Per-note peak amplitude in 16-bit PCM units.
    pub amplitude: f32,
    /// Largest block rendered at once; longer requests are split.
    pub max_block_frames: usize,
    /// Oscillator phase strategy.
    pub phase_mode: PhaseMode,
    /// Initial waveform.
    pub waveform: Waveform,
    /// Handling of notes noticed after their start time.
    pub late_policy: LatePolicy,
    /// Behavior of `stop_all`.
    pub stop_mode: StopMode,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: 1,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            fade_out_secs: DEFAULT_FADE_OUT_SECS,
            amplitude: DEFAULT_AMPLITUDE,
            max_block_frames: DEFAULT_MAX_BLOCK_FRAMES,
            phase_mode: PhaseMode::default(),
            waveform: Waveform::default(),
            late_policy: LatePolicy::default(),
            stop_mode: StopMode::default(),
        }
    }
}

impl EngineParams {
    /// Builder: set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Builder: set the channel count.
    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    /// Builder: set the pool capacity.
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    /// Check every field, returning the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(SynthError::invalid("sample_rate", "must be non-zero"));
        }
        if self.channels == 0 {
            return Err(SynthError::invalid("channels", "must be non-zero"));
        }
        if self.pool_capacity == 0 {
            return Err(SynthError::invalid("pool_capacity", "must be non-zero"));
        }
        if self.max_block_frames == 0 {
            return Err(SynthError::invalid("max_block_frames", "must be non-zero"));
        }
        if !self.fade_out_secs.is_finite() || self.fade_out_secs < 0.0 {
            return Err(SynthError::invalid(
                "fade_out_secs",
                "must be finite and non-negative",
            ));
        }
        if !self.amplitude.is_finite() || self.amplitude < 0.0 {
            return Err(SynthError::invalid(
                "amplitude",
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }

    /// Fade-out length in samples.
    pub fn fade_out_samples(&self) -> f64 {
        self.fade_out_secs * f64::from(self.sample_rate)
    }
}
