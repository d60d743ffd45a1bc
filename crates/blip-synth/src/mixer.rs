//! Real-time tone mixer.
//!
//! The [`Mixer`] owns the note pool and the audio clock. Each call to
//! [`Mixer::render`] runs, per block of at most `max_block_frames` frames:
//!
//! 1. drop notes whose fade finished before the block starts
//! 2. mark notes whose start falls inside the block as active
//! 3. sum every active note sample by sample, scaled by amplitude, master
//!    volume, and the note's envelope
//! 4. peak-normalize the block into 16-bit PCM
//! 5. copy the mono result to every output channel
//!
//! The clock advances once per call, after the last block.
//!
//! Scratch buffers are sized at construction; rendering never allocates,
//! locks, or panics.

use blip_core::{AudioClock, ClockHandle, Oscillator, PcmSample, Waveform, normalize_into};

use crate::error::Result;
use crate::note::{Note, ToneRequest};
use crate::params::{EngineParams, LatePolicy, StopMode};
use crate::pool::NotePool;

/// Polyphonic tone mixer driven by the audio callback.
///
/// # Example
///
/// ```rust
/// use blip_synth::{EngineParams, Mixer, ToneRequest};
///
/// let mut mixer = Mixer::new(EngineParams::default()).unwrap();
/// mixer.schedule(ToneRequest::new(440.0, 0.0, 0.1));
///
/// let mut out = [0i16; 512];
/// mixer.render(&mut out);
/// assert!(out.iter().any(|&s| s != 0));
/// assert_eq!(mixer.clock_handle().samples(), 512);
/// ```
#[derive(Debug)]
pub struct Mixer {
    params: EngineParams,
    oscillator: Oscillator,
    pool: NotePool,
    clock: AudioClock,
    fade_len: f64,
    volume: f32,
    mix: Vec<f32>,
    pcm: Vec<i16>,
}

impl Mixer {
    /// Create a mixer, reserving all storage it will ever use.
    pub fn new(params: EngineParams) -> Result<Self> {
        params.validate()?;

        tracing::debug!(
            sample_rate = params.sample_rate,
            channels = params.channels,
            pool_capacity = params.pool_capacity,
            max_block_frames = params.max_block_frames,
            "mixer created"
        );

        let oscillator = Oscillator::new(params.sample_rate as f32)
            .with_mode(params.phase_mode)
            .with_waveform(params.waveform);

        Ok(Self {
            params,
            oscillator,
            pool: NotePool::with_capacity(params.pool_capacity),
            clock: AudioClock::new(params.sample_rate),
            fade_len: params.fade_out_samples(),
            volume: 1.0,
            mix: vec![0.0; params.max_block_frames],
            pcm: vec![0; params.max_block_frames],
        })
    }

    /// Parameters the mixer was built with.
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Add a note to the pool.
    ///
    /// Returns `false` if the note was dropped: no audible frequency, pool
    /// full, or already late under [`LatePolicy::Skip`].
    pub fn schedule(&mut self, request: ToneRequest) -> bool {
        if !request.is_playable() {
            return false;
        }
        let mut note = Note::new(&request, &self.oscillator, self.fade_len);
        let now = self.clock.samples() as f64;
        if note.envelope().start() < now {
            match self.params.late_policy {
                LatePolicy::Restart => note.envelope_mut().shift_to(now),
                LatePolicy::Truncate => {}
                LatePolicy::Skip => return false,
            }
        }
        self.pool.try_insert(note)
    }

    /// Silence everything, as configured by [`StopMode`].
    pub fn stop_all(&mut self) {
        match self.params.stop_mode {
            StopMode::Immediate => self.pool.clear(),
            StopMode::Fade => {
                let now = self.clock.samples();
                self.pool.retain(|note| {
                    if note.envelope().start() > now as f64 {
                        return false;
                    }
                    note.envelope_mut().release_at(now);
                    true
                });
            }
        }
    }

    /// Fill `out` with interleaved PCM and advance the clock.
    ///
    /// `out.len()` should be a multiple of the channel count; trailing samples
    /// that do not fill a whole frame are set to silence.
    pub fn render<S: PcmSample>(&mut self, out: &mut [S]) {
        let channels = usize::from(self.params.channels);
        let frames = out.len() / channels;
        let (body, tail) = out.split_at_mut(frames * channels);
        tail.fill(S::SILENCE);
        if frames == 0 {
            return;
        }

        let start = self.clock.samples();
        let mut offset = 0u64;
        let block = self.params.max_block_frames * channels;
        for chunk in body.chunks_mut(block) {
            let n = chunk.len() / channels;
            if self.pool.is_empty() {
                chunk.fill(S::SILENCE);
            } else {
                self.render_block(start + offset, n);
                for (frame, &value) in chunk.chunks_exact_mut(channels).zip(&self.pcm[..n]) {
                    frame.fill(S::from_pcm16(value));
                }
            }
            offset += n as u64;
        }
        // Readers only ever see whole buffers.
        self.clock.advance(offset);
    }

    /// Mix `frames` samples starting at tick `now` into `self.pcm`.
    fn render_block(&mut self, now: u64, frames: usize) {
        let end = now + frames as u64;
        self.pool.retain(|note| !note.envelope().is_finished(now));

        let mix = &mut self.mix[..frames];
        mix.fill(0.0);
        let gain = self.params.amplitude * self.volume;
        for note in self.pool.iter_mut() {
            let first = note.envelope().first_tick();
            if first >= end {
                continue;
            }
            note.activate();
            note.render_into(&self.oscillator, gain, mix, now, first.max(now));
        }

        normalize_into(mix, &mut self.pcm[..frames]);
    }

    /// Elapsed audio time in seconds.
    pub fn audio_time(&self) -> f64 {
        self.clock.seconds()
    }

    /// Read-only handle to the mixer's clock.
    pub fn clock_handle(&self) -> ClockHandle {
        self.clock.handle()
    }

    /// Number of notes that have started and not yet been removed.
    pub fn active_notes(&self) -> usize {
        self.pool.iter().filter(|n| n.is_active()).count()
    }

    /// Number of notes in the pool, started or not.
    pub fn resident_notes(&self) -> usize {
        self.pool.len()
    }

    /// Resident notes in scheduling order.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.pool.iter()
    }

    /// Master volume in `[0, 1]`.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set master volume, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }

    /// Current waveform.
    pub fn waveform(&self) -> Waveform {
        self.oscillator.waveform()
    }

    /// Switch waveform for every note, including those already playing.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.oscillator.set_waveform(waveform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixer() -> Mixer {
        Mixer::new(EngineParams::default()).unwrap()
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(Mixer::new(EngineParams::default().with_channels(0)).is_err());
    }

    #[test]
    fn test_empty_pool_renders_silence() {
        let mut m = mixer();
        let mut out = [5i16; 256];
        m.render(&mut out);
        assert_eq!(out, [0; 256]);
        assert_eq!(m.clock_handle().samples(), 256);
    }

    #[test]
    fn test_zero_length_is_noop() {
        let mut m = mixer();
        m.schedule(ToneRequest::new(440.0, 0.0, 1.0));
        let mut out: [i16; 0] = [];
        m.render(&mut out);
        assert_eq!(m.audio_time(), 0.0);
        assert_eq!(m.active_notes(), 0);
    }

    #[test]
    fn test_activation_when_start_reached() {
        let mut m = mixer();
        m.schedule(ToneRequest::new(440.0, 1000.0 / 44100.0, 0.1));
        let mut out = [0i16; 512];
        m.render(&mut out);
        assert_eq!(m.active_notes(), 0);
        assert_eq!(m.resident_notes(), 1);
        m.render(&mut out);
        assert_eq!(m.active_notes(), 1);
    }

    #[test]
    fn test_note_removed_after_fade() {
        let mut m = mixer();
        m.schedule(ToneRequest::new(440.0, 0.0, 0.01));
        let mut out = [0i16; 512];
        // 441 sustain + 2205 fade = 2646 samples; removed at the first block after that.
        for _ in 0..7 {
            m.render(&mut out);
        }
        assert_eq!(m.resident_notes(), 0);
    }

    #[test]
    fn test_schedule_rejects_silent_requests() {
        let mut m = mixer();
        assert!(!m.schedule(ToneRequest::new(0.0, 0.0, 1.0)));
        assert!(!m.schedule(ToneRequest::new(f32::NAN, 0.0, 1.0)));
        assert_eq!(m.resident_notes(), 0);
    }

    #[test]
    fn test_volume_scales_output() {
        let mut full = mixer();
        let mut half = mixer();
        half.set_volume(0.5);
        for m in [&mut full, &mut half] {
            m.schedule(ToneRequest::new(440.0, 0.0, 1.0));
        }
        let mut a = [0i16; 512];
        let mut b = [0i16; 512];
        full.render(&mut a);
        half.render(&mut b);
        for (x, y) in a.iter().zip(&b) {
            assert!((i32::from(*x) / 2 - i32::from(*y)).abs() <= 1);
        }
    }

    #[test]
    fn test_volume_clamped() {
        let mut m = mixer();
        m.set_volume(3.0);
        assert_eq!(m.volume(), 1.0);
        m.set_volume(-1.0);
        assert_eq!(m.volume(), 0.0);
        m.set_volume(f32::NAN);
        assert_eq!(m.volume(), 0.0);
    }

    #[test]
    fn test_waveform_switch_applies_to_playing_notes() {
        let mut m = mixer();
        m.schedule(ToneRequest::new(440.0, 0.0, 1.0));
        let mut out = [0i16; 256];
        m.render(&mut out);
        m.set_waveform(Waveform::QuantizedSine);
        m.render(&mut out);
        assert!(out.iter().all(|&s| s == 0 || s == 10000 || s == -10000));
    }

    #[test]
    fn test_immediate_stop_clears_pool() {
        let params = EngineParams {
            stop_mode: StopMode::Immediate,
            ..EngineParams::default()
        };
        let mut m = Mixer::new(params).unwrap();
        m.schedule(ToneRequest::new(440.0, 0.0, 1.0));
        m.schedule(ToneRequest::new(660.0, 5.0, 1.0));
        m.stop_all();
        assert_eq!(m.resident_notes(), 0);
    }

    #[test]
    fn test_fade_stop_drops_pending_and_releases_sustaining() {
        let mut m = mixer();
        m.schedule(ToneRequest::new(440.0, 0.0, 1.0));
        m.schedule(ToneRequest::new(660.0, 5.0, 1.0));
        let mut out = [0i16; 512];
        m.render(&mut out);
        m.stop_all();
        assert_eq!(m.resident_notes(), 1);
        let note = m.notes().next().unwrap();
        assert_eq!(note.frequency(), 440.0);
        assert_eq!(note.envelope().end(), 512.0);
    }

    #[test]
    fn test_long_buffer_keeps_block_positions() {
        let params = EngineParams {
            max_block_frames: 64,
            ..EngineParams::default()
        };
        let mut m = Mixer::new(params).unwrap();
        let clock = m.clock_handle();
        m.schedule(ToneRequest::new(440.0, 150.0 / 44100.0, 0.1));

        let mut out = [0i16; 1000];
        m.render(&mut out);

        let first = out.iter().position(|&s| s != 0).unwrap();
        assert!((150..160).contains(&first), "first sound at {first}");
        assert!(out[..150].iter().all(|&s| s == 0));
        assert_eq!(clock.samples(), 1000);
        assert_eq!(m.active_notes(), 1);
    }

    #[test]
    fn test_trailing_partial_frame_is_silenced() {
        let mut m = Mixer::new(EngineParams::default().with_channels(2)).unwrap();
        m.schedule(ToneRequest::new(440.0, 0.0, 1.0));
        let mut out = [7i16; 9];
        m.render(&mut out);
        assert_eq!(out[8], 0);
        assert_eq!(m.clock_handle().samples(), 4);
    }
}
