//! Shared CLI helpers used across multiple commands.

use std::path::Path;

use blip_config::{AudioConfig, PcmFormat, find_config};
use blip_io::{BackendStreamConfig, SampleFormat, SoundSettings};

use crate::tune::{ToneSpec, demo_jingle};

/// Load the settings file, falling back to defaults when there is none.
///
/// An explicit path that does not exist is an error.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<AudioConfig> {
    match find_config(explicit) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading settings");
            Ok(AudioConfig::load(&path)?)
        }
        None => {
            if let Some(path) = explicit {
                anyhow::bail!("settings file '{}' not found", path.display());
            }
            Ok(AudioConfig::default())
        }
    }
}

fn sample_format(format: PcmFormat) -> SampleFormat {
    match format {
        PcmFormat::I16 => SampleFormat::I16,
        PcmFormat::F32 => SampleFormat::F32,
    }
}

/// Everything `open_sound` needs, from the settings file.
pub fn sound_settings(config: &AudioConfig) -> SoundSettings {
    SoundSettings {
        enabled: config.sound_enabled,
        stream: BackendStreamConfig {
            sample_rate: config.sample_rate,
            buffer_size: config.buffer_size,
            channels: config.channels,
            format: sample_format(config.format),
            device_name: config.device.clone(),
        },
        params: config.to_engine_params(),
        volume: config.volume,
        quantized: config.quantized,
    }
}

/// The tones to play: the demo jingle first if asked for, then `--tone`s.
pub fn collect_tones(tones: Vec<ToneSpec>, demo: bool) -> anyhow::Result<Vec<ToneSpec>> {
    let mut all = if demo { demo_jingle() } else { Vec::new() };
    all.extend(tones);
    if all.is_empty() {
        anyhow::bail!("nothing to play (use --tone FREQ:DUR[@WHEN] or --demo)");
    }
    Ok(all)
}
