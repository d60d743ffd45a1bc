//! Blip Core - tone synthesis primitives
//!
//! The building blocks of blip's real-time tone engine, designed for use
//! inside an audio callback: no allocation, no locks, no panics on any input.
//!
//! # Components
//!
//! ## Oscillators
//!
//! - [`Oscillator`] - frequency + sample index to waveform sample
//! - [`PhaseMode`] - continuous accumulator or fixed-point phase ([`PhaseBits`])
//! - [`Waveform`] - true sine or the four-level [`quantized_sine`]
//!
//! ## Envelope
//!
//! - [`FadeEnvelope`] - full level for the note's duration, then a linear fade
//!
//! ## Timeline
//!
//! - [`AudioClock`] - sample-count clock advanced by the mixer
//! - [`ClockHandle`] - read-only view for game logic
//!
//! ## PCM
//!
//! - [`normalize_into`] - block peak normalization + 16-bit rounding
//! - [`PcmSample`] - output sample types (`i16`, `f32`)
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! blip-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use blip_core::{AudioClock, FadeEnvelope, Oscillator, normalize_into};
//!
//! let osc = Oscillator::new(44100.0);
//! let env = FadeEnvelope::from_seconds(0.0, 0.1, 0.05, 44100.0);
//! let mut clock = AudioClock::new(44100);
//!
//! let mut phase = osc.start(440.0);
//! let mut mix = [0.0f32; 256];
//! for (i, s) in mix.iter_mut().enumerate() {
//!     let tick = clock.samples() + i as u64;
//!     *s = osc.sample(&mut phase, tick) * 10000.0 * env.amplitude_at(tick);
//! }
//!
//! let mut pcm = [0i16; 256];
//! normalize_into(&mix, &mut pcm);
//! clock.advance(256);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod clock;
pub mod envelope;
pub mod oscillator;
pub mod pcm;

pub use clock::{AudioClock, ClockHandle, samples_to_seconds};
pub use envelope::FadeEnvelope;
pub use oscillator::{
    Oscillator, Phase, PhaseBits, PhaseMode, Waveform, fixed_point_angle, fixed_point_increment,
    fixed_point_phase, quantized_sine,
};
pub use pcm::{PCM_CEILING, PcmSample, normalization_gain, normalize_into, peak, quantize};
