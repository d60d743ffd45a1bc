//! 16-bit WAV reading and writing.

use crate::Result;
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV file specification for 16-bit PCM output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of interleaved channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 44100,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }
}

/// Write interleaved 16-bit samples to a WAV file.
pub fn write_wav_i16<P: AsRef<Path>>(path: P, samples: &[i16], spec: WavSpec) -> Result<()> {
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Read a 16-bit integer WAV file.
pub fn read_wav_i16<P: AsRef<Path>>(path: P) -> Result<(Vec<i16>, WavSpec)> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(hound::Error::Unsupported.into());
    }
    let samples = reader.samples::<i16>().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((
        samples,
        WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
        },
    ))
}
