//! Audio output layer for blip.
//!
//! This crate connects the tone engine from `blip-synth` to real hardware:
//!
//! - **Backends**: the object-safe [`AudioBackend`] trait and its cpal
//!   implementation [`CpalBackend`]
//! - **Opening sound**: [`open_sound`] negotiates a format, builds the engine
//!   at the obtained rate, and falls back to a silent [`Sound`] on any failure
//! - **Offline rendering**: [`render_to_vec`] and [`write_wav_i16`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use blip_io::{CpalBackend, SoundSettings, open_sound};
//!
//! let sound = open_sound(&CpalBackend::new(), &SoundSettings::default());
//! let tones = sound.scheduler();
//! tones.play_tone(440.0, 0.1, tones.audio_time());
//! ```

pub mod backend;
pub mod cpal_backend;
mod device;
pub mod render;
pub mod sound;
mod wav;

pub use backend::{
    AudioBackend, BackendStreamConfig, ErrorCallback, NegotiatedStream, OutputBuffer,
    OutputCallback, SampleFormat, StreamHandle,
};
pub use cpal_backend::CpalBackend;
pub use device::AudioDevice;
pub use render::{render_blocks, render_to_vec};
pub use sound::{OffReason, Sound, SoundSettings, SoundStatus, open_sound};
pub use wav::{WavSpec, read_wav_i16, write_wav_i16};

/// Error types for audio output operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio output device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// The device cannot provide the requested sample format.
    #[error("Sample format mismatch: requested {requested}, device offers {obtained}")]
    FormatMismatch {
        /// Format that was asked for.
        requested: String,
        /// Format the device offers instead.
        obtained: String,
    },

    /// The tone engine rejected its parameters.
    #[error("Engine error: {0}")]
    Engine(#[from] blip_synth::SynthError),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio output operations.
pub type Result<T> = std::result::Result<T, Error>;
