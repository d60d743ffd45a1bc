//! Tone lists from the command line.
//!
//! A tone is written `FREQ:DUR[@WHEN]`: frequency in Hz, duration in seconds,
//! and an optional start offset in seconds (default 0). For example
//! `440:0.25@1.5` is a quarter-second A4 starting one and a half seconds in.

use std::fmt;
use std::str::FromStr;

/// One tone, with its start relative to the beginning of the tune.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub frequency: f32,
    pub duration: f64,
    pub when: f64,
}

impl ToneSpec {
    pub fn new(frequency: f32, duration: f64, when: f64) -> Self {
        Self {
            frequency,
            duration,
            when,
        }
    }

    /// Nominal end, before the fade.
    pub fn end(&self) -> f64 {
        self.when + self.duration
    }
}

impl fmt::Display for ToneSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.frequency, self.duration, self.when)
    }
}

impl FromStr for ToneSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tone, when) = match s.split_once('@') {
            Some((tone, when)) => (tone, Some(when)),
            None => (s, None),
        };
        let Some((freq, dur)) = tone.split_once(':') else {
            return Err(format!("invalid tone '{s}' (expected FREQ:DUR[@WHEN])"));
        };

        let frequency: f32 = freq
            .trim()
            .parse()
            .map_err(|_| format!("invalid frequency '{freq}'"))?;
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(format!("frequency must be positive, got {frequency}"));
        }

        let duration = parse_seconds(dur, "duration")?;
        let when = match when {
            Some(w) => parse_seconds(w, "start")?,
            None => 0.0,
        };

        Ok(Self::new(frequency, duration, when))
    }
}

fn parse_seconds(text: &str, what: &str) -> Result<f64, String> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| format!("invalid {what} '{text}'"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{what} must be a non-negative number of seconds"));
    }
    Ok(value)
}

/// clap `value_parser` for `--tone`.
pub fn parse_tone(s: &str) -> Result<ToneSpec, String> {
    s.parse()
}

/// Time at which the last tone reaches its nominal end.
pub fn tune_length(tones: &[ToneSpec]) -> f64 {
    tones.iter().map(ToneSpec::end).fold(0.0, f64::max)
}

/// A short rising jingle followed by a chord.
pub fn demo_jingle() -> Vec<ToneSpec> {
    const C5: f32 = 523.25;
    const E5: f32 = 659.25;
    const G5: f32 = 783.99;
    const C6: f32 = 1046.5;

    let mut tones: Vec<ToneSpec> = [C5, E5, G5, C6]
        .iter()
        .enumerate()
        .map(|(i, &f)| ToneSpec::new(f, 0.12, i as f64 * 0.15))
        .collect();
    tones.extend([C5, E5, G5].map(|f| ToneSpec::new(f, 0.5, 0.7)));
    tones
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        assert_eq!(
            parse_tone("440:0.25@1.5"),
            Ok(ToneSpec::new(440.0, 0.25, 1.5))
        );
    }

    #[test]
    fn test_parse_without_start() {
        assert_eq!(parse_tone("880:1"), Ok(ToneSpec::new(880.0, 1.0, 0.0)));
        assert_eq!(parse_tone(" 220 : 0.5 "), Ok(ToneSpec::new(220.0, 0.5, 0.0)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_tone("440").is_err());
        assert!(parse_tone("abc:1").is_err());
        assert!(parse_tone("440:x").is_err());
        assert!(parse_tone("440:1@").is_err());
        assert!(parse_tone("0:1").is_err());
        assert!(parse_tone("-440:1").is_err());
        assert!(parse_tone("440:-1").is_err());
        assert!(parse_tone("440:1@-2").is_err());
        assert!(parse_tone("inf:1").is_err());
    }

    #[test]
    fn test_display_parses_back() {
        let tone = ToneSpec::new(523.25, 0.12, 0.3);
        assert_eq!(tone.to_string().parse::<ToneSpec>(), Ok(tone));
    }

    #[test]
    fn test_tune_length() {
        assert_eq!(tune_length(&[]), 0.0);
        let tones = [ToneSpec::new(440.0, 1.0, 0.0), ToneSpec::new(440.0, 0.5, 2.0)];
        assert_eq!(tune_length(&tones), 2.5);
    }

    #[test]
    fn test_demo_jingle() {
        let tones = demo_jingle();
        assert_eq!(tones.len(), 7);
        assert!((tune_length(&tones) - 1.2).abs() < 1e-12);
        assert!(tones.iter().all(|t| t.frequency > 0.0));
    }
}
