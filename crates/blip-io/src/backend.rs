//! Pluggable audio backend abstraction.
//!
//! [`AudioBackend`] decouples the tone engine from any specific platform audio
//! API. Opening output is split in two steps so that the engine can be built
//! at whatever format the device actually grants:
//!
//! ```text
//! BackendStreamConfig ──negotiate──► NegotiatedStream
//!                                          │
//!               ToneEngine at obtained rate/channels
//!                                          │
//!               build_output_stream(callback) ──► StreamHandle
//! ```
//!
//! The trait uses boxed closures for callbacks rather than generic parameters,
//! keeping it object-safe so backends can be selected at runtime and mocked in
//! tests. Stream handles are type-erased and stop playback on drop.

use std::fmt;

use crate::{AudioDevice, Result};

/// PCM sample format of an output stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SampleFormat {
    /// Signed 16-bit integer.
    #[default]
    I16,
    /// 32-bit float in `[-1, 1]`.
    F32,
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SampleFormat::I16 => "i16",
            SampleFormat::F32 => "f32",
        })
    }
}

/// Requested output stream configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendStreamConfig {
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Preferred buffer size in frames.
    pub buffer_size: u32,
    /// Requested channel count.
    pub channels: u16,
    /// Required sample format.
    pub format: SampleFormat,
    /// Optional device name fragment (uses system default if `None`).
    pub device_name: Option<String>,
}

impl Default for BackendStreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            buffer_size: 512,
            channels: 1,
            format: SampleFormat::I16,
            device_name: None,
        }
    }
}

/// What the device actually granted.
///
/// The sample format always equals the requested one; rate and channel count
/// may differ.
#[derive(Debug, Clone, PartialEq)]
pub struct NegotiatedStream {
    /// Device the stream will open on.
    pub device_name: String,
    /// Obtained sample rate in Hz.
    pub sample_rate: u32,
    /// Obtained channel count.
    pub channels: u16,
    /// Sample format.
    pub format: SampleFormat,
    /// Fixed buffer size in frames, or `None` for the device default.
    pub buffer_size: Option<u32>,
}

/// Type-erased audio stream handle.
///
/// Wraps a backend-specific stream object. The stream is active while this
/// handle exists; dropping it stops playback.
pub struct StreamHandle {
    _inner: Box<dyn Send>,
}

impl StreamHandle {
    /// Wrap a backend-specific stream object, keeping it alive until drop.
    pub fn new<T: Send + 'static>(stream: T) -> Self {
        Self {
            _inner: Box::new(stream),
        }
    }
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// Interleaved device buffer handed to the output callback.
#[derive(Debug)]
pub enum OutputBuffer<'a> {
    /// 16-bit integer samples.
    I16(&'a mut [i16]),
    /// Float samples.
    F32(&'a mut [f32]),
}

impl OutputBuffer<'_> {
    /// Number of samples across all channels.
    pub fn len(&self) -> usize {
        match self {
            OutputBuffer::I16(b) => b.len(),
            OutputBuffer::F32(b) => b.len(),
        }
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Audio output callback.
///
/// Runs on the real-time audio thread. Implementations must not allocate,
/// lock mutexes, or perform I/O.
pub type OutputCallback = Box<dyn FnMut(OutputBuffer<'_>) + Send>;

/// Error callback, invoked with a human-readable message when the stream fails.
pub type ErrorCallback = Box<dyn FnMut(&str) + Send>;

/// Pluggable audio output backend.
pub trait AudioBackend: Send {
    /// Human-readable name of this backend (e.g., "cpal", "mock").
    fn name(&self) -> &str;

    /// List available output devices.
    fn list_devices(&self) -> Result<Vec<AudioDevice>>;

    /// Get the default output device, if any.
    fn default_output_device(&self) -> Result<Option<AudioDevice>>;

    /// Resolve `config` against the device.
    ///
    /// Fails with [`Error::NoDevice`](crate::Error::NoDevice) or
    /// [`Error::DeviceNotFound`](crate::Error::DeviceNotFound) when no device
    /// can be opened, and with
    /// [`Error::FormatMismatch`](crate::Error::FormatMismatch) when the device
    /// cannot provide the requested sample format.
    fn negotiate(&self, config: &BackendStreamConfig) -> Result<NegotiatedStream>;

    /// Build and start an output stream in the negotiated format.
    ///
    /// The callback receives buffers of `negotiated.format`. The returned
    /// [`StreamHandle`] keeps the stream alive.
    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        negotiated: &NegotiatedStream,
        callback: OutputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle>;
}
