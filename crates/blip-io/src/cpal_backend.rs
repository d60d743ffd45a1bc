//! cpal-based audio backend implementation.
//!
//! [`CpalBackend`] wraps [cpal](https://crates.io/crates/cpal) for
//! cross-platform output on ALSA (Linux), CoreAudio (macOS), and WASAPI
//! (Windows).
//!
//! ## Negotiation
//!
//! The sample format must match exactly; a device that cannot provide it is
//! reported as a [`Error::FormatMismatch`]. Sample rate and channel count are
//! allowed to change. Among the device's configuration ranges in the right
//! format, the first that matches is used, in this order:
//!
//! 1. requested channels, requested rate within range
//! 2. any channels, requested rate within range
//! 3. requested channels, rate clamped to range
//! 4. any range, rate clamped
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blip_io::{AudioBackend, BackendStreamConfig, CpalBackend, OutputBuffer};
//!
//! let backend = CpalBackend::new();
//! let config = BackendStreamConfig::default();
//! let negotiated = backend.negotiate(&config)?;
//! let stream = backend.build_output_stream(
//!     &config,
//!     &negotiated,
//!     Box::new(|buffer| match buffer {
//!         OutputBuffer::I16(b) => b.fill(0),
//!         OutputBuffer::F32(b) => b.fill(0.0),
//!     }),
//!     Box::new(|err| eprintln!("Audio error: {}", err)),
//! )?;
//! // Stream plays until `stream` is dropped.
//! ```

use crate::backend::{
    AudioBackend, BackendStreamConfig, ErrorCallback, NegotiatedStream, OutputBuffer,
    OutputCallback, SampleFormat, StreamHandle,
};
use crate::device::{self, device_name};
use crate::{AudioDevice, Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Host, SupportedBufferSize, SupportedStreamConfigRange};

/// cpal-based audio backend.
///
/// Holds a cpal [`Host`], the connection to the platform's audio system.
pub struct CpalBackend {
    host: Host,
}

impl CpalBackend {
    /// Create a new cpal backend using the platform's default audio host.
    pub fn new() -> Self {
        let host = cpal::default_host();
        tracing::info!(host = host.id().name(), "cpal backend initialized");
        Self { host }
    }

    /// Find a cpal output device by name fragment, or return the default.
    fn find_output_device(&self, name: Option<&str>) -> Result<cpal::Device> {
        match name {
            Some(search) => {
                let search_lower = search.to_lowercase();
                let devices = self
                    .host
                    .output_devices()
                    .map_err(|e| Error::Stream(e.to_string()))?;

                for device in devices {
                    if let Ok(dev_name) = device_name(&device)
                        && dev_name.to_lowercase().contains(search_lower.as_str())
                    {
                        return Ok(device);
                    }
                }
                Err(Error::DeviceNotFound(format!(
                    "no output device matching '{}'",
                    search
                )))
            }
            None => self.host.default_output_device().ok_or(Error::NoDevice),
        }
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn to_cpal(format: SampleFormat) -> cpal::SampleFormat {
    match format {
        SampleFormat::I16 => cpal::SampleFormat::I16,
        SampleFormat::F32 => cpal::SampleFormat::F32,
    }
}

fn contains_rate(range: &SupportedStreamConfigRange, rate: u32) -> bool {
    range.min_sample_rate() <= rate && rate <= range.max_sample_rate()
}

/// Pick a configuration range, following the order in the module docs.
fn choose_range<'a>(
    ranges: &'a [SupportedStreamConfigRange],
    config: &BackendStreamConfig,
) -> Option<&'a SupportedStreamConfigRange> {
    let rate = config.sample_rate;
    ranges
        .iter()
        .find(|r| r.channels() == config.channels && contains_rate(r, rate))
        .or_else(|| ranges.iter().find(|r| contains_rate(r, rate)))
        .or_else(|| ranges.iter().find(|r| r.channels() == config.channels))
        .or_else(|| ranges.first())
}

impl AudioBackend for CpalBackend {
    fn name(&self) -> &'static str {
        "cpal"
    }

    fn list_devices(&self) -> Result<Vec<AudioDevice>> {
        Ok(device::list_output_devices(&self.host))
    }

    fn default_output_device(&self) -> Result<Option<AudioDevice>> {
        Ok(device::default_output_device(&self.host))
    }

    fn negotiate(&self, config: &BackendStreamConfig) -> Result<NegotiatedStream> {
        let device = self.find_output_device(config.device_name.as_deref())?;
        let name = device_name(&device).unwrap_or_else(|_| "unknown".to_string());
        let wanted = to_cpal(config.format);

        let ranges: Vec<SupportedStreamConfigRange> = device
            .supported_output_configs()
            .map_err(|e| Error::Stream(e.to_string()))?
            .filter(|r| r.sample_format() == wanted)
            .collect();

        let Some(range) = choose_range(&ranges, config) else {
            let obtained = device
                .default_output_config()
                .map(|c| c.sample_format().to_string())
                .unwrap_or_else(|_| "nothing".to_string());
            return Err(Error::FormatMismatch {
                requested: config.format.to_string(),
                obtained,
            });
        };

        let sample_rate = config
            .sample_rate
            .clamp(range.min_sample_rate(), range.max_sample_rate());
        let buffer_size = match range.buffer_size() {
            SupportedBufferSize::Range { min, max } => {
                Some(config.buffer_size.clamp(*min, (*max).max(*min)))
            }
            SupportedBufferSize::Unknown => None,
        };

        Ok(NegotiatedStream {
            device_name: name,
            sample_rate,
            channels: range.channels(),
            format: config.format,
            buffer_size,
        })
    }

    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        negotiated: &NegotiatedStream,
        mut callback: OutputCallback,
        mut error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        let device = self.find_output_device(config.device_name.as_deref())?;

        let stream_config = cpal::StreamConfig {
            channels: negotiated.channels,
            sample_rate: negotiated.sample_rate,
            buffer_size: negotiated
                .buffer_size
                .map_or(cpal::BufferSize::Default, cpal::BufferSize::Fixed),
        };

        let on_error = move |err: cpal::StreamError| error_callback(&err.to_string());
        let stream = match negotiated.format {
            SampleFormat::I16 => device.build_output_stream(
                &stream_config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    callback(OutputBuffer::I16(data));
                },
                on_error,
                None,
            ),
            SampleFormat::F32 => device.build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    callback(OutputBuffer::F32(data));
                },
                on_error,
                None,
            ),
        }
        .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(
            device = %negotiated.device_name,
            channels = negotiated.channels,
            sample_rate = negotiated.sample_rate,
            format = %negotiated.format,
            "output stream started"
        );

        Ok(StreamHandle::new(stream))
    }
}
