//! Tone oscillators with selectable phase strategies.
//!
//! An [`Oscillator`] turns a frequency and an absolute sample index into one
//! waveform sample. Two phase strategies are available:
//!
//! - [`PhaseMode::Continuous`] keeps a floating-point accumulator per voice and
//!   adds `2π·f/sr` every sample. Cheap and smooth, but the phase depends on
//!   how long the voice has been running and slowly picks up rounding drift.
//! - [`PhaseMode::FixedPoint`] maps one cycle onto the integer range
//!   `0..PHASE_MAX` and derives the phase from the absolute sample index alone:
//!
//! ```text
//! increment = floor(f · PHASE_MAX / sr)
//! phase     = (tick · increment) mod PHASE_MAX
//! angle     = 2π · phase / PHASE_MAX
//! ```
//!
//! The fixed-point output is a pure function of the elapsed tick count, so two
//! notes at the same frequency are sample-identical no matter when they began.
//!
//! Independently of the strategy, the [`Waveform`] selects either a true sine or
//! the coarse [`Waveform::QuantizedSine`], which snaps the angle to the nearest
//! quarter turn and only ever produces `0`, `1`, or `-1`. The quantized shape is
//! a deliberate lo-fi character and is toggled at runtime by the player.

use core::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};
use libm::{floorf, sinf};

/// Width of the fixed-point phase cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PhaseBits {
    /// `PHASE_MAX = 2^24`, fits a 32-bit tick counter.
    Bits24,
    /// `PHASE_MAX = 2^32`, needs a 64-bit tick counter.
    #[default]
    Bits32,
}

impl PhaseBits {
    /// Number of bits in one phase cycle.
    pub const fn bits(self) -> u32 {
        match self {
            PhaseBits::Bits24 => 24,
            PhaseBits::Bits32 => 32,
        }
    }

    /// Integer length of one full cycle (`PHASE_MAX`).
    pub const fn phase_max(self) -> u64 {
        1u64 << self.bits()
    }

    /// Mask selecting the in-cycle part of a phase value.
    #[inline]
    pub const fn mask(self) -> u64 {
        self.phase_max() - 1
    }
}

/// Phase accumulation strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseMode {
    /// Per-voice floating-point accumulator.
    Continuous,
    /// Phase derived from the absolute tick with integer arithmetic.
    FixedPoint(PhaseBits),
}

impl Default for PhaseMode {
    fn default() -> Self {
        PhaseMode::FixedPoint(PhaseBits::Bits32)
    }
}

/// Output waveform shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Waveform {
    /// True sine.
    #[default]
    Sine,
    /// Four-level sine approximation: `0, 1, 0, -1` per quarter turn.
    QuantizedSine,
}

/// Per-voice oscillator state.
///
/// Created by [`Oscillator::start`] when a note starts and dropped with it.
/// `current_phase` and `phase_step` are only advanced by the continuous
/// strategy; `increment` is only read by the fixed-point strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Phase {
    /// Accumulated phase in radians, kept within `[0, 2π)`.
    pub current_phase: f32,
    /// Radians added per sample.
    pub phase_step: f32,
    /// Fixed-point increment per sample.
    pub increment: u64,
}

/// Frequency-to-sample converter shared by every voice of a mixer.
///
/// # Example
///
/// ```rust
/// use blip_core::{Oscillator, PhaseBits, PhaseMode, Waveform};
///
/// let osc = Oscillator::new(44100.0)
///     .with_mode(PhaseMode::FixedPoint(PhaseBits::Bits24))
///     .with_waveform(Waveform::Sine);
///
/// let mut phase = osc.start(440.0);
/// let first = osc.sample(&mut phase, 0);
/// assert_eq!(first, 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oscillator {
    sample_rate: f32,
    mode: PhaseMode,
    waveform: Waveform,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl Oscillator {
    /// Create a sine oscillator using the default fixed-point strategy.
    pub fn new(sample_rate: f32) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, "oscillator created");

        Self {
            sample_rate,
            mode: PhaseMode::default(),
            waveform: Waveform::default(),
        }
    }

    /// Builder: select the phase strategy.
    pub fn with_mode(mut self, mode: PhaseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder: select the waveform.
    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Current phase strategy.
    pub fn mode(&self) -> PhaseMode {
        self.mode
    }

    /// Current waveform.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Switch waveform. Voices already playing pick it up on their next sample.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Build the per-voice state for a tone at `frequency` Hz.
    pub fn start(&self, frequency: f32) -> Phase {
        let phase_step = if self.sample_rate > 0.0 {
            TAU / (self.sample_rate / frequency)
        } else {
            0.0
        };
        let increment = match self.mode {
            PhaseMode::Continuous => 0,
            PhaseMode::FixedPoint(bits) => {
                fixed_point_increment(frequency, self.sample_rate, bits)
            }
        };
        Phase {
            current_phase: 0.0,
            phase_step: if phase_step.is_finite() { phase_step } else { 0.0 },
            increment,
        }
    }

    /// Evaluate one sample at absolute sample index `tick`.
    ///
    /// The continuous strategy ignores `tick` and advances `phase` instead.
    #[inline]
    pub fn sample(&self, phase: &mut Phase, tick: u64) -> f32 {
        let angle = match self.mode {
            PhaseMode::Continuous => {
                let angle = phase.current_phase;
                phase.current_phase += phase.phase_step;
                if phase.current_phase >= TAU {
                    phase.current_phase -= TAU;
                }
                angle
            }
            PhaseMode::FixedPoint(bits) => {
                fixed_point_angle(fixed_point_phase(phase.increment, tick, bits), bits)
            }
        };
        match self.waveform {
            Waveform::Sine => sinf(angle),
            Waveform::QuantizedSine => quantized_sine(angle),
        }
    }
}

/// Fixed-point phase increment: `floor(frequency · PHASE_MAX / sample_rate)`.
///
/// Negative, non-finite, or zero-rate inputs yield 0 (a silent, constant phase).
pub fn fixed_point_increment(frequency: f32, sample_rate: f32, bits: PhaseBits) -> u64 {
    if frequency.is_nan() || sample_rate.is_nan() || frequency <= 0.0 || sample_rate <= 0.0 {
        return 0;
    }
    let inc = f64::from(frequency) * bits.phase_max() as f64 / f64::from(sample_rate);
    if inc.is_finite() { inc as u64 } else { 0 }
}

/// Fixed-point phase at `tick`: `(tick · increment) mod PHASE_MAX`.
///
/// Uses wrapping multiplication; only the low `bits` bits matter, so the
/// result is identical to the computation done in a narrower tick type.
#[inline]
pub fn fixed_point_phase(increment: u64, tick: u64, bits: PhaseBits) -> u64 {
    tick.wrapping_mul(increment) & bits.mask()
}

/// Convert a fixed-point phase to radians in `[0, 2π)`.
#[inline]
pub fn fixed_point_angle(phase: u64, bits: PhaseBits) -> f32 {
    (TAU * phase as f32) / bits.phase_max() as f32
}

/// Wrap an angle into `[0, 2π)`.
#[inline]
fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle - TAU * floorf(angle / TAU);
    if wrapped >= TAU || wrapped < 0.0 { 0.0 } else { wrapped }
}

/// Sine snapped to the nearest quarter turn.
///
/// Returns `0` near 0 and π, `1` near π/2, `-1` near 3π/2. Boundaries sit at the
/// odd multiples of π/4, with the lower bound of each band inclusive.
#[inline]
pub fn quantized_sine(angle: f32) -> f32 {
    let angle = normalize_angle(angle);
    if angle < FRAC_PI_4 || angle >= TAU - FRAC_PI_4 {
        0.0
    } else if angle < FRAC_PI_2 + FRAC_PI_4 {
        1.0
    } else if angle < PI + FRAC_PI_4 {
        0.0
    } else {
        -1.0
    }
}
