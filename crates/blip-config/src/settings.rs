//! The audio settings file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use blip_synth::{EngineParams, LatePolicy, PhaseBits, PhaseMode, StopMode, Waveform};

use crate::error::ConfigError;
use crate::validation::validate_config;

/// PCM sample format requested from the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PcmFormat {
    /// Signed 16-bit.
    #[default]
    I16,
    /// 32-bit float.
    F32,
}

/// Oscillator phase strategy, as spelled in the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseSetting {
    /// Floating-point accumulator per note.
    Continuous,
    /// Fixed-point phase with a 2^24 cycle.
    Fixed24,
    /// Fixed-point phase with a 2^32 cycle.
    #[default]
    Fixed32,
}

impl From<PhaseSetting> for PhaseMode {
    fn from(setting: PhaseSetting) -> Self {
        match setting {
            PhaseSetting::Continuous => PhaseMode::Continuous,
            PhaseSetting::Fixed24 => PhaseMode::FixedPoint(PhaseBits::Bits24),
            PhaseSetting::Fixed32 => PhaseMode::FixedPoint(PhaseBits::Bits32),
        }
    }
}

/// Handling of notes that arrive after their start time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LateNotes {
    /// Play in full from now.
    #[default]
    Restart,
    /// Play the remainder.
    Truncate,
    /// Drop.
    Skip,
}

impl From<LateNotes> for LatePolicy {
    fn from(setting: LateNotes) -> Self {
        match setting {
            LateNotes::Restart => LatePolicy::Restart,
            LateNotes::Truncate => LatePolicy::Truncate,
            LateNotes::Skip => LatePolicy::Skip,
        }
    }
}

/// Behavior of "stop all tones".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopSetting {
    /// Fade sustaining notes out.
    #[default]
    Fade,
    /// Cut everything.
    Immediate,
}

impl From<StopSetting> for StopMode {
    fn from(setting: StopSetting) -> Self {
        match setting {
            StopSetting::Fade => StopMode::Fade,
            StopSetting::Immediate => StopMode::Immediate,
        }
    }
}

/// `[synth]` table: mixer tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Maximum resident notes.
    pub pool_capacity: usize,
    /// Fade after a note's end, in milliseconds.
    pub fade_out_ms: f64,
    /// Per-note peak amplitude in 16-bit PCM units.
    pub amplitude: f32,
    /// Phase strategy.
    pub phase: PhaseSetting,
    /// Late note handling.
    pub late_notes: LateNotes,
    /// Stop behavior.
    pub stop: StopSetting,
}

impl Default for SynthConfig {
    fn default() -> Self {
        let params = EngineParams::default();
        Self {
            pool_capacity: params.pool_capacity,
            fade_out_ms: params.fade_out_secs * 1000.0,
            amplitude: params.amplitude,
            phase: PhaseSetting::default(),
            late_notes: LateNotes::default(),
            stop: StopSetting::default(),
        }
    }
}

/// Audio settings, stored as TOML.
///
/// Every field is optional in the file; missing ones take their defaults.
///
/// # TOML Format
///
/// ```toml
/// sound_enabled = true
/// device = "USB"
/// sample_rate = 44100
/// buffer_size = 512
/// channels = 1
/// format = "i16"
/// volume = 0.8
/// quantized = false
///
/// [synth]
/// pool_capacity = 128
/// fade_out_ms = 50.0
/// amplitude = 10000.0
/// phase = "fixed32"
/// late_notes = "restart"
/// stop = "fade"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Open the device at startup.
    pub sound_enabled: bool,
    /// Output device name fragment; system default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Requested device buffer in frames.
    pub buffer_size: u32,
    /// Requested channel count.
    pub channels: u16,
    /// Required sample format.
    pub format: PcmFormat,
    /// Initial master volume in `[0, 1]`.
    pub volume: f32,
    /// Start with the quantized sine.
    pub quantized: bool,
    /// Mixer tuning.
    pub synth: SynthConfig,
}

impl Default for AudioConfig {
    fn default() -> Self {
        let params = EngineParams::default();
        Self {
            sound_enabled: true,
            device: None,
            sample_rate: params.sample_rate,
            buffer_size: params.max_block_frames as u32,
            channels: params.channels,
            format: PcmFormat::default(),
            volume: 1.0,
            quantized: false,
            synth: SynthConfig::default(),
        }
    }
}

impl AudioConfig {
    /// Load and validate settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(ConfigError::reading(path))?;
        Self::from_toml(&content)
    }

    /// Parse and validate settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: AudioConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the settings to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(ConfigError::creating_dir(parent))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(ConfigError::writing(path))?;
        Ok(())
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check all fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_config(self)?;
        Ok(())
    }

    /// Engine parameters for the requested format.
    ///
    /// Sample rate and channel count are the requested ones; the caller
    /// replaces them with whatever the device grants.
    pub fn to_engine_params(&self) -> EngineParams {
        EngineParams {
            sample_rate: self.sample_rate,
            channels: self.channels,
            pool_capacity: self.synth.pool_capacity,
            fade_out_secs: self.synth.fade_out_ms / 1000.0,
            amplitude: self.synth.amplitude,
            phase_mode: self.synth.phase.into(),
            waveform: if self.quantized {
                Waveform::QuantizedSine
            } else {
                Waveform::Sine
            },
            late_policy: self.synth.late_notes.into(),
            stop_mode: self.synth.stop.into(),
            ..EngineParams::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine() {
        let config = AudioConfig::default();
        assert_eq!(config.to_engine_params(), EngineParams::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(AudioConfig::from_toml("").unwrap(), AudioConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let config = AudioConfig::from_toml(
            r#"
            volume = 0.25
            format = "f32"

            [synth]
            phase = "continuous"
            "#,
        )
        .unwrap();
        assert_eq!(config.volume, 0.25);
        assert_eq!(config.format, PcmFormat::F32);
        assert_eq!(config.synth.phase, PhaseSetting::Continuous);
        assert_eq!(config.synth.pool_capacity, 128);
        assert_eq!(config.sample_rate, 44100);
    }

    #[test]
    fn test_enum_spellings() {
        let config = AudioConfig::from_toml(
            r#"
            [synth]
            phase = "fixed24"
            late_notes = "skip"
            stop = "immediate"
            "#,
        )
        .unwrap();
        let params = config.to_engine_params();
        assert_eq!(params.phase_mode, PhaseMode::FixedPoint(PhaseBits::Bits24));
        assert_eq!(params.late_policy, LatePolicy::Skip);
        assert_eq!(params.stop_mode, StopMode::Immediate);
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        let err = AudioConfig::from_toml(r#"format = "u8""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = AudioConfig::from_toml("volume = 2.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_quantized_selects_waveform() {
        let config = AudioConfig {
            quantized: true,
            ..AudioConfig::default()
        };
        assert_eq!(
            config.to_engine_params().waveform,
            Waveform::QuantizedSine
        );
    }

    #[test]
    fn test_fade_converted_to_seconds() {
        let mut config = AudioConfig::default();
        config.synth.fade_out_ms = 120.0;
        assert!((config.to_engine_params().fade_out_secs - 0.12).abs() < 1e-12);
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let mut config = AudioConfig::default();
        config.device = Some("Speakers".to_string());
        config.synth.stop = StopSetting::Immediate;
        let text = config.to_toml().unwrap();
        assert!(text.contains("[synth]"));
        assert!(text.contains(r#"stop = "immediate""#));
        assert_eq!(AudioConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_no_device_key_when_default() {
        let text = AudioConfig::default().to_toml().unwrap();
        assert!(!text.contains("device"));
    }
}
