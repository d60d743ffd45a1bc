//! Integration tests for blip-io: opening sound through a mock backend,
//! degradation to sound off, and offline WAV rendering.

use std::sync::{Arc, Mutex};

use blip_io::{
    AudioBackend, AudioDevice, BackendStreamConfig, Error, ErrorCallback, NegotiatedStream,
    OffReason, OutputBuffer, OutputCallback, Result, SampleFormat, SoundSettings, SoundStatus,
    StreamHandle, WavSpec, open_sound, read_wav_i16, render_to_vec, write_wav_i16,
};
use blip_synth::{EngineParams, ToneEngine};
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// Mock backend
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Behavior {
    /// Grant the request, optionally changing rate and channels.
    Grant { sample_rate: u32, channels: u16 },
    /// No device at all.
    NoDevice,
    /// Device only offers the other sample format.
    WrongFormat,
    /// Negotiation succeeds but the stream refuses to start.
    StreamFails,
}

type SharedCallback = Arc<Mutex<Option<OutputCallback>>>;

struct MockBackend {
    behavior: Behavior,
    callback: SharedCallback,
}

impl MockBackend {
    fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            callback: Arc::new(Mutex::new(None)),
        }
    }

    /// Invoke the installed callback like a device would.
    fn pull_i16(&self, frames: usize, channels: usize) -> Vec<i16> {
        let mut buf = vec![0i16; frames * channels];
        let mut guard = self.callback.lock().unwrap();
        let callback = guard.as_mut().expect("no stream built");
        callback(OutputBuffer::I16(&mut buf));
        buf
    }

    fn pull_f32(&self, frames: usize) -> Vec<f32> {
        let mut buf = vec![0.0f32; frames];
        let mut guard = self.callback.lock().unwrap();
        let callback = guard.as_mut().expect("no stream built");
        callback(OutputBuffer::F32(&mut buf));
        buf
    }
}

impl AudioBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn list_devices(&self) -> Result<Vec<AudioDevice>> {
        Ok(vec![AudioDevice {
            name: "Mock Output".to_string(),
            is_default: true,
            default_sample_rate: 44100,
            default_channels: 2,
        }])
    }

    fn default_output_device(&self) -> Result<Option<AudioDevice>> {
        Ok(self.list_devices()?.into_iter().next())
    }

    fn negotiate(&self, config: &BackendStreamConfig) -> Result<NegotiatedStream> {
        match self.behavior {
            Behavior::Grant {
                sample_rate,
                channels,
            } => Ok(NegotiatedStream {
                device_name: "Mock Output".to_string(),
                sample_rate,
                channels,
                format: config.format,
                buffer_size: Some(config.buffer_size),
            }),
            Behavior::StreamFails => Ok(NegotiatedStream {
                device_name: "Mock Output".to_string(),
                sample_rate: config.sample_rate,
                channels: config.channels,
                format: config.format,
                buffer_size: None,
            }),
            Behavior::NoDevice => Err(Error::NoDevice),
            Behavior::WrongFormat => Err(Error::FormatMismatch {
                requested: config.format.to_string(),
                obtained: "u8".to_string(),
            }),
        }
    }

    fn build_output_stream(
        &self,
        _config: &BackendStreamConfig,
        _negotiated: &NegotiatedStream,
        callback: OutputCallback,
        _error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        if let Behavior::StreamFails = self.behavior {
            return Err(Error::Stream("device busy".to_string()));
        }
        *self.callback.lock().unwrap() = Some(callback);
        Ok(StreamHandle::new(()))
    }
}

// ---------------------------------------------------------------------------
// Opening sound
// ---------------------------------------------------------------------------

#[test]
fn opens_and_plays_through_callback() {
    let backend = MockBackend::new(Behavior::Grant {
        sample_rate: 44100,
        channels: 1,
    });
    let sound = open_sound(&backend, &SoundSettings::default());
    assert!(sound.is_on());
    assert_eq!(
        sound.status(),
        &SoundStatus::On {
            device: "Mock Output".to_string(),
            sample_rate: 44100,
            channels: 1,
            format: SampleFormat::I16,
        }
    );

    let tones = sound.scheduler();
    tones.play_tone(440.0, 0.1, tones.audio_time());
    let out = backend.pull_i16(512, 1);
    assert!(out.iter().any(|&s| s != 0));
    assert!((tones.audio_time() - 512.0 / 44100.0).abs() < 1e-12);
}

#[test]
fn engine_follows_obtained_rate_and_channels() {
    let backend = MockBackend::new(Behavior::Grant {
        sample_rate: 48000,
        channels: 2,
    });
    let sound = open_sound(&backend, &SoundSettings::default());
    let tones = sound.scheduler();
    assert_eq!(tones.clock_handle().sample_rate(), 48000);

    tones.play_tone(440.0, 0.1, 0.0);
    let out = backend.pull_i16(480, 2);
    for frame in out.chunks_exact(2) {
        assert_eq!(frame[0], frame[1]);
    }
    assert!((tones.audio_time() - 0.01).abs() < 1e-12);
}

#[test]
fn float_stream_receives_scaled_pcm() {
    let backend = MockBackend::new(Behavior::Grant {
        sample_rate: 44100,
        channels: 1,
    });
    let settings = SoundSettings {
        stream: BackendStreamConfig {
            format: SampleFormat::F32,
            ..BackendStreamConfig::default()
        },
        ..SoundSettings::default()
    };
    let sound = open_sound(&backend, &settings);
    sound.scheduler().play_tone(440.0, 0.1, 0.0);
    let out = backend.pull_f32(512);
    assert!(out.iter().all(|s| s.abs() <= 10000.0 / 32768.0 + 1e-6));
    assert!(out.iter().any(|&s| s != 0.0));
}

#[test]
fn settings_volume_and_quantized_applied() {
    let backend = MockBackend::new(Behavior::Grant {
        sample_rate: 44100,
        channels: 1,
    });
    let settings = SoundSettings {
        volume: 0.5,
        quantized: true,
        ..SoundSettings::default()
    };
    let sound = open_sound(&backend, &settings);
    assert_eq!(sound.scheduler().volume(), 0.5);
    assert!(sound.scheduler().is_quantized());

    sound.scheduler().play_tone(1000.0, 0.1, 0.0);
    let out = backend.pull_i16(512, 1);
    assert!(out.iter().all(|&s| s == 0 || s == 5000 || s == -5000));
}

// ---------------------------------------------------------------------------
// Degradation to sound off
// ---------------------------------------------------------------------------

#[test]
fn missing_device_turns_sound_off() {
    let backend = MockBackend::new(Behavior::NoDevice);
    let sound = open_sound(&backend, &SoundSettings::default());
    assert!(!sound.is_on());
    assert!(matches!(
        sound.status(),
        SoundStatus::Off(OffReason::DeviceUnavailable(_))
    ));

    let tones = sound.scheduler();
    tones.play_tone(440.0, 0.1, 0.0);
    tones.stop_tone();
    tones.volume_up();
    assert_eq!(tones.audio_time(), 0.0);
}

#[test]
fn format_mismatch_turns_sound_off() {
    let backend = MockBackend::new(Behavior::WrongFormat);
    let sound = open_sound(&backend, &SoundSettings::default());
    assert_eq!(
        sound.status(),
        &SoundStatus::Off(OffReason::FormatMismatch {
            requested: "i16".to_string(),
            obtained: "u8".to_string(),
        })
    );
    assert!(!sound.scheduler().is_enabled());
}

#[test]
fn stream_failure_turns_sound_off() {
    let backend = MockBackend::new(Behavior::StreamFails);
    let sound = open_sound(&backend, &SoundSettings::default());
    assert!(matches!(sound.status(), SoundStatus::Off(OffReason::Stream(_))));
}

#[test]
fn invalid_engine_params_turn_sound_off() {
    let backend = MockBackend::new(Behavior::Grant {
        sample_rate: 0,
        channels: 1,
    });
    let sound = open_sound(&backend, &SoundSettings::default());
    assert!(!sound.is_on());
}

#[test]
fn disabled_settings_never_touch_backend() {
    let backend = MockBackend::new(Behavior::Grant {
        sample_rate: 44100,
        channels: 1,
    });
    let settings = SoundSettings {
        enabled: false,
        ..SoundSettings::default()
    };
    let sound = open_sound(&backend, &settings);
    assert_eq!(sound.status(), &SoundStatus::Off(OffReason::Disabled));
    assert!(backend.callback.lock().unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Offline rendering
// ---------------------------------------------------------------------------

#[test]
fn render_to_wav_roundtrip() {
    let params = EngineParams::default();
    let (tones, mut renderer) = ToneEngine::new(params).unwrap().split();
    tones.play_tone(440.0, 0.1, 0.0);
    tones.play_tone(660.0, 0.1, 0.1);

    let samples = render_to_vec(&mut renderer, 44100 / 2, 512);
    let spec = WavSpec {
        channels: 1,
        sample_rate: 44100,
    };

    let file = NamedTempFile::new().unwrap();
    write_wav_i16(file.path(), &samples, spec).unwrap();
    let (read, read_spec) = read_wav_i16(file.path()).unwrap();

    assert_eq!(read_spec, spec);
    assert_eq!(read, samples);
    // Second note decays by 0.2 s + fade.
    let tail = (0.25 * 44100.0) as usize + 1;
    assert!(read[tail..].iter().all(|&s| s == 0));
}
