//! Tone requests and resident notes.

use blip_core::{FadeEnvelope, Oscillator, Phase};

/// A tone requested by game logic.
///
/// Times are seconds on the audio clock. `when` may already be in the past.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneRequest {
    /// Frequency in Hz. Zero means "no tone".
    pub frequency: f32,
    /// Start time in seconds on the audio clock.
    pub when: f64,
    /// Sustain length in seconds, before the fade.
    pub duration: f64,
}

impl ToneRequest {
    /// Create a request. Negative durations are treated as zero.
    pub fn new(frequency: f32, when: f64, duration: f64) -> Self {
        Self {
            frequency,
            when,
            duration: duration.max(0.0),
        }
    }

    /// Whether the request describes something that can sound.
    pub fn is_playable(&self) -> bool {
        is_audible(self.frequency) && self.when.is_finite() && self.duration.is_finite()
    }
}

#[inline]
pub(crate) fn is_audible(frequency: f32) -> bool {
    frequency.is_finite() && frequency > 0.0
}

/// A note resident in the mixer's pool.
#[derive(Clone, Copy, Debug)]
pub struct Note {
    frequency: f32,
    envelope: FadeEnvelope,
    phase: Phase,
    active: bool,
}

impl Note {
    /// Build a resident note from a request.
    pub fn new(request: &ToneRequest, oscillator: &Oscillator, fade_len: f64) -> Self {
        let sample_rate = f64::from(oscillator.sample_rate());
        let start = request.when * sample_rate;
        let end = start + request.duration * sample_rate;
        Self {
            frequency: request.frequency,
            envelope: FadeEnvelope::new(start, end, fade_len),
            phase: oscillator.start(request.frequency),
            active: false,
        }
    }

    /// Frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Amplitude envelope in sample units.
    pub fn envelope(&self) -> &FadeEnvelope {
        &self.envelope
    }

    /// Whether the mixer has reached the note's start.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn envelope_mut(&mut self) -> &mut FadeEnvelope {
        &mut self.envelope
    }

    pub(crate) fn activate(&mut self) {
        self.active = true;
    }

    /// Mix samples `from..end` of this note into `mix`, where `mix[0]` is sample `now`.
    #[inline]
    pub(crate) fn render_into(
        &mut self,
        oscillator: &Oscillator,
        gain: f32,
        mix: &mut [f32],
        now: u64,
        from: u64,
    ) {
        let end = now + mix.len() as u64;
        for tick in from..end {
            let level = self.envelope.amplitude_at(tick);
            let value = oscillator.sample(&mut self.phase, tick);
            mix[(tick - now) as usize] += value * gain * level;
        }
    }
}
