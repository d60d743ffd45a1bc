//! Blip Synth - polyphonic tone scheduling and mixing
//!
//! This crate turns tone requests from game logic into a PCM stream inside a
//! real-time audio callback.
//!
//! # Core Components
//!
//! ## Mixing
//!
//! - [`Mixer`] - owns the note pool and audio clock, renders PCM blocks
//! - [`NotePool`] - fixed-capacity, never-reallocating note storage
//! - [`EngineParams`] - sample rate, channels, capacity, fade, policies
//!
//! ## Threading
//!
//! - [`ToneEngine`] - builds a mixer and splits it into two halves
//! - [`ToneScheduler`] - logic thread: `play_tone`, `stop_tone`, `audio_time`
//! - [`ToneRenderer`] - audio thread: drains requests and renders
//!
//! # Example
//!
//! ```rust
//! use blip_synth::{EngineParams, ToneEngine};
//!
//! let (scheduler, mut renderer) = ToneEngine::new(EngineParams::default())
//!     .unwrap()
//!     .split();
//!
//! // Logic thread: a short A4 right now, an E5 a tenth of a second later.
//! let now = scheduler.audio_time();
//! scheduler.play_tone(440.0, 0.1, now);
//! scheduler.play_tone(659.25, 0.1, now + 0.1);
//!
//! // Audio thread: the device callback.
//! let mut buffer = [0i16; 512];
//! renderer.render(&mut buffer);
//! assert!(scheduler.audio_time() > 0.0);
//! ```

pub mod controls;
pub mod engine;
pub mod error;
pub mod mixer;
pub mod note;
pub mod params;
pub mod pool;

pub use controls::{AtomicParam, SharedControls};
pub use engine::{ToneCommand, ToneEngine, ToneRenderer, ToneScheduler, VOLUME_STEP};
pub use error::{Result, SynthError};
pub use mixer::Mixer;
pub use note::{Note, ToneRequest};
pub use params::{
    DEFAULT_AMPLITUDE, DEFAULT_FADE_OUT_SECS, DEFAULT_MAX_BLOCK_FRAMES, DEFAULT_POOL_CAPACITY,
    DEFAULT_SAMPLE_RATE, EngineParams, LatePolicy, StopMode,
};
pub use pool::NotePool;

pub use blip_core::{ClockHandle, PcmSample, PhaseBits, PhaseMode, Waveform};
