//! Hold-then-fade amplitude envelope for scheduled tones.
//!
//! A tone plays at full level from its start to its nominal end, then ramps
//! linearly to silence over the fade length:
//!
//! ```text
//! 1.0 ┤      ┌────────────┐
//!     │      │            │╲
//!     │      │            │  ╲
//! 0.0 ┼──────┘            │    ╲─────────
//!          start         end   end + fade
//! ```
//!
//! Positions are fractional sample indices on the audio clock, so a tone can
//! start or end between two samples without rounding its length.

use libm::floor;

/// Hold-then-linear-fade envelope in sample units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeEnvelope {
    start: f64,
    end: f64,
    fade_len: f64,
}

impl FadeEnvelope {
    /// Create an envelope covering `[start, end]` followed by a `fade_len` ramp.
    ///
    /// `end` is raised to `start` if it precedes it and a negative fade is
    /// treated as zero.
    pub fn new(start: f64, end: f64, fade_len: f64) -> Self {
        Self {
            start,
            end: end.max(start),
            fade_len: fade_len.max(0.0),
        }
    }

    /// Build from seconds on the audio clock.
    pub fn from_seconds(when: f64, duration: f64, fade_secs: f64, sample_rate: f64) -> Self {
        let start = when * sample_rate;
        Self::new(start, start + duration.max(0.0) * sample_rate, fade_secs * sample_rate)
    }

    /// First sample position with non-zero level.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Position where the fade begins.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Length of the fade in samples.
    pub fn fade_len(&self) -> f64 {
        self.fade_len
    }

    /// Position where the fade reaches zero.
    pub fn silent_at(&self) -> f64 {
        self.end + self.fade_len
    }

    /// First integer tick at or after the start.
    pub fn first_tick(&self) -> u64 {
        let first = -floor(-self.start);
        if first <= 0.0 { 0 } else { first as u64 }
    }

    /// Amplitude at absolute sample `tick`, in `[0, 1]`.
    #[inline]
    pub fn amplitude_at(&self, tick: u64) -> f32 {
        let t = tick as f64;
        if t < self.start {
            0.0
        } else if t <= self.end {
            1.0
        } else if self.fade_len <= 0.0 {
            0.0
        } else {
            let level = 1.0 - (t - self.end) / self.fade_len;
            if level > 0.0 { level as f32 } else { 0.0 }
        }
    }

    /// Whether the envelope has fully decayed before `tick`.
    pub fn is_finished(&self, tick: u64) -> bool {
        tick as f64 > self.silent_at()
    }

    /// Whether `tick` lies in the sustained part.
    pub fn is_sustaining(&self, tick: u64) -> bool {
        let t = tick as f64;
        t >= self.start && t <= self.end
    }

    /// Amplitude lost per sample during the fade.
    pub fn slope(&self) -> f32 {
        if self.fade_len > 0.0 {
            (1.0 / self.fade_len) as f32
        } else {
            1.0
        }
    }

    /// Begin the fade at `tick`.
    ///
    /// Only shortens the sustained part: an envelope already fading keeps its
    /// ramp, and one that has not started yet is unaffected.
    pub fn release_at(&mut self, tick: u64) {
        let t = tick as f64;
        if t >= self.start && t < self.end {
            self.end = t;
        }
    }

    /// Move the whole envelope so that it starts at `start`.
    pub fn shift_to(&mut self, start: f64) {
        let hold = self.end - self.start;
        self.start = start;
        self.end = start + hold;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_before_start() {
        let env = FadeEnvelope::new(100.0, 200.0, 50.0);
        assert_eq!(env.amplitude_at(0), 0.0);
        assert_eq!(env.amplitude_at(99), 0.0);
        assert_eq!(env.amplitude_at(100), 1.0);
    }

    #[test]
    fn test_hold_is_full_level() {
        let env = FadeEnvelope::new(0.0, 4410.0, 2205.0);
        for tick in 0..=4410 {
            assert_eq!(env.amplitude_at(tick), 1.0);
        }
    }

    #[test]
    fn test_fade_reaches_zero_at_right_edge() {
        let env = FadeEnvelope::new(0.0, 4410.0, 2205.0);
        assert_eq!(env.amplitude_at(6615), 0.0);
        assert!(env.amplitude_at(6614) > 0.0);
        assert_eq!(env.amplitude_at(100_000), 0.0);
    }

    #[test]
    fn test_fade_is_monotonic() {
        let env = FadeEnvelope::new(10.0, 500.0, 300.0);
        let mut prev = env.amplitude_at(500);
        for tick in 501..=800 {
            let level = env.amplitude_at(tick);
            assert!(level <= prev, "rose at {tick}: {prev} -> {level}");
            assert!(prev - level <= env.slope() + 1e-6);
            prev = level;
        }
        assert_eq!(prev, 0.0);
    }

    #[test]
    fn test_from_seconds() {
        let env = FadeEnvelope::from_seconds(0.0, 0.1, 0.05, 44100.0);
        assert!((env.end() - 4410.0).abs() < 1e-6);
        assert!((env.silent_at() - 6615.0).abs() < 1e-6);
    }

    #[test]
    fn test_negative_duration_is_clamped() {
        let env = FadeEnvelope::from_seconds(1.0, -3.0, 0.05, 100.0);
        assert_eq!(env.start(), env.end());
    }

    #[test]
    fn test_zero_fade_is_hard_stop() {
        let env = FadeEnvelope::new(0.0, 10.0, 0.0);
        assert_eq!(env.amplitude_at(10), 1.0);
        assert_eq!(env.amplitude_at(11), 0.0);
    }

    #[test]
    fn test_finished() {
        let env = FadeEnvelope::new(0.0, 10.0, 5.0);
        assert!(!env.is_finished(15));
        assert!(env.is_finished(16));
    }

    #[test]
    fn test_first_tick() {
        assert_eq!(FadeEnvelope::new(10.0, 20.0, 0.0).first_tick(), 10);
        assert_eq!(FadeEnvelope::new(10.2, 20.0, 0.0).first_tick(), 11);
        assert_eq!(FadeEnvelope::new(-4.0, 20.0, 0.0).first_tick(), 0);
    }

    #[test]
    fn test_release_while_sustaining() {
        let mut env = FadeEnvelope::new(0.0, 1000.0, 100.0);
        env.release_at(300);
        assert_eq!(env.end(), 300.0);
        assert_eq!(env.amplitude_at(300), 1.0);
        assert!(env.amplitude_at(350) < 1.0);
        assert_eq!(env.amplitude_at(400), 0.0);
    }

    #[test]
    fn test_release_does_not_restart_fade() {
        let mut env = FadeEnvelope::new(0.0, 100.0, 100.0);
        let before = env.amplitude_at(150);
        env.release_at(150);
        assert_eq!(env.end(), 100.0);
        assert_eq!(env.amplitude_at(150), before);
    }

    #[test]
    fn test_release_before_start_is_ignored() {
        let mut env = FadeEnvelope::new(500.0, 1000.0, 100.0);
        env.release_at(10);
        assert_eq!(env.end(), 1000.0);
    }

    #[test]
    fn test_shift_keeps_hold_length() {
        let mut env = FadeEnvelope::new(100.0, 250.0, 30.0);
        env.shift_to(1000.0);
        assert_eq!(env.start(), 1000.0);
        assert_eq!(env.end(), 1150.0);
        assert_eq!(env.fade_len(), 30.0);
    }
}
