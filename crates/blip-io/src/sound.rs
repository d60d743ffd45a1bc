//! Opening sound, with a silent fallback.
//!
//! Audio failures are resolved once, here. [`open_sound`] never fails: if the
//! device is missing, cannot provide the requested format, or refuses to
//! start, the result is a [`Sound`] whose scheduler is permanently off and
//! whose every entry point is a no-op. Game code never checks for errors.

use std::fmt;

use blip_synth::{EngineParams, ToneEngine, ToneScheduler};

use crate::backend::{
    AudioBackend, BackendStreamConfig, ErrorCallback, OutputBuffer, OutputCallback, SampleFormat,
    StreamHandle,
};
use crate::{Error, Result};

/// Everything needed to open sound.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundSettings {
    /// Start with sound on. `false` gives a silent engine without touching
    /// any device.
    pub enabled: bool,
    /// Requested device format.
    pub stream: BackendStreamConfig,
    /// Engine parameters; rate and channels are replaced by what the device grants.
    pub params: EngineParams,
    /// Initial master volume in `[0, 1]`.
    pub volume: f32,
    /// Start with the quantized sine.
    pub quantized: bool,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            stream: BackendStreamConfig::default(),
            params: EngineParams::default(),
            volume: 1.0,
            quantized: false,
        }
    }
}

/// Why sound is off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffReason {
    /// Turned off by settings.
    Disabled,
    /// No usable output device.
    DeviceUnavailable(String),
    /// The device cannot provide the requested sample format.
    FormatMismatch {
        /// Requested format.
        requested: String,
        /// Format the device offers.
        obtained: String,
    },
    /// The stream could not be built or started.
    Stream(String),
}

impl From<&Error> for OffReason {
    fn from(err: &Error) -> Self {
        match err {
            Error::NoDevice | Error::DeviceNotFound(_) => {
                OffReason::DeviceUnavailable(err.to_string())
            }
            Error::FormatMismatch {
                requested,
                obtained,
            } => OffReason::FormatMismatch {
                requested: requested.clone(),
                obtained: obtained.clone(),
            },
            other => OffReason::Stream(other.to_string()),
        }
    }
}

impl fmt::Display for OffReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OffReason::Disabled => f.write_str("disabled"),
            OffReason::DeviceUnavailable(msg) => write!(f, "device unavailable ({msg})"),
            OffReason::FormatMismatch {
                requested,
                obtained,
            } => write!(f, "format mismatch (wanted {requested}, got {obtained})"),
            OffReason::Stream(msg) => write!(f, "stream failed ({msg})"),
        }
    }
}

/// Outcome of [`open_sound`].
#[derive(Debug, Clone, PartialEq)]
pub enum SoundStatus {
    /// Playing on a device.
    On {
        /// Device name.
        device: String,
        /// Obtained sample rate in Hz.
        sample_rate: u32,
        /// Obtained channel count.
        channels: u16,
        /// Sample format.
        format: SampleFormat,
    },
    /// Silent.
    Off(OffReason),
}

/// An open (or silently closed) sound output.
///
/// Keeps the device stream alive; dropping it stops playback.
#[derive(Debug)]
pub struct Sound {
    scheduler: ToneScheduler,
    status: SoundStatus,
    _stream: Option<StreamHandle>,
}

impl Sound {
    /// A sound output that never plays anything.
    pub fn off(sample_rate: u32, reason: OffReason) -> Self {
        Self {
            scheduler: ToneScheduler::disabled(sample_rate),
            status: SoundStatus::Off(reason),
            _stream: None,
        }
    }

    /// Logic-thread handle for playing tones.
    pub fn scheduler(&self) -> &ToneScheduler {
        &self.scheduler
    }

    /// Whether the device was opened.
    pub fn status(&self) -> &SoundStatus {
        &self.status
    }

    /// Whether sound is currently on.
    pub fn is_on(&self) -> bool {
        matches!(self.status, SoundStatus::On { .. }) && self.scheduler.is_enabled()
    }
}

/// Open sound on `backend`, or fall back to silence.
pub fn open_sound(backend: &dyn AudioBackend, settings: &SoundSettings) -> Sound {
    if !settings.enabled {
        tracing::info!("sound disabled by settings");
        return Sound::off(settings.stream.sample_rate, OffReason::Disabled);
    }

    match try_open(backend, settings) {
        Ok(sound) => sound,
        Err(err) => {
            tracing::warn!(
                backend = backend.name(),
                error = %err,
                "audio unavailable, continuing without sound"
            );
            Sound::off(settings.stream.sample_rate, OffReason::from(&err))
        }
    }
}

fn try_open(backend: &dyn AudioBackend, settings: &SoundSettings) -> Result<Sound> {
    let requested = &settings.stream;
    let negotiated = backend.negotiate(requested)?;

    tracing::info!(
        device = %negotiated.device_name,
        requested_rate = requested.sample_rate,
        obtained_rate = negotiated.sample_rate,
        requested_channels = requested.channels,
        obtained_channels = negotiated.channels,
        format = %negotiated.format,
        buffer_size = ?negotiated.buffer_size,
        "audio format negotiated"
    );
    if negotiated.format != requested.format {
        return Err(Error::FormatMismatch {
            requested: requested.format.to_string(),
            obtained: negotiated.format.to_string(),
        });
    }

    let params = settings
        .params
        .with_sample_rate(negotiated.sample_rate)
        .with_channels(negotiated.channels);
    let (scheduler, mut renderer) = ToneEngine::new(params)?.split();
    scheduler.set_volume(settings.volume);
    scheduler.set_quantized(settings.quantized);

    let callback: OutputCallback = Box::new(move |buffer: OutputBuffer<'_>| match buffer {
        OutputBuffer::I16(data) => renderer.render(data),
        OutputBuffer::F32(data) => renderer.render(data),
    });
    let error_callback: ErrorCallback = Box::new(|msg: &str| {
        tracing::error!(error = msg, "audio stream error");
    });

    let stream = backend.build_output_stream(requested, &negotiated, callback, error_callback)?;

    Ok(Sound {
        scheduler,
        status: SoundStatus::On {
            device: negotiated.device_name,
            sample_rate: negotiated.sample_rate,
            channels: negotiated.channels,
            format: negotiated.format,
        },
        _stream: Some(stream),
    })
}
