//! Range checks for audio settings.
//!
//! All violations are collected, so a broken file reports every bad field at
//! once rather than one per run.
//!
//! # Example
//!
//! ```rust
//! use blip_config::{AudioConfig, ValidationError, validate_config};
//!
//! let mut config = AudioConfig::default();
//! config.volume = 1.5;
//! assert!(matches!(
//!     validate_config(&config),
//!     Err(ValidationError::OutOfRange { .. })
//! ));
//! ```

use thiserror::Error;

use crate::settings::AudioConfig;

/// Accepted sample rates in Hz.
pub const SAMPLE_RATE_RANGE: (u32, u32) = (8000, 192_000);
/// Accepted device buffer sizes in frames.
pub const BUFFER_SIZE_RANGE: (u32, u32) = (16, 8192);
/// Accepted channel counts.
pub const CHANNELS_RANGE: (u16, u16) = (1, 8);
/// Accepted pool capacities.
pub const POOL_CAPACITY_RANGE: (usize, usize) = (1, 4096);
/// Accepted fade lengths in milliseconds.
pub const FADE_OUT_MS_RANGE: (f64, f64) = (0.0, 5000.0);
/// Accepted per-note amplitudes.
pub const AMPLITUDE_RANGE: (f32, f32) = (0.0, 32767.0);

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Value outside its accepted range.
    #[error("'{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Field name as spelled in the file.
        field: String,
        /// The offending value.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// A string field that must not be blank.
    #[error("'{0}' must not be empty")]
    Empty(String),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn check_range(
    errors: &mut Vec<ValidationError>,
    field: &str,
    value: f64,
    (min, max): (f64, f64),
) {
    // Containment also rejects NaN.
    if !(min..=max).contains(&value) {
        errors.push(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
}

fn widen<T: Into<f64>>((min, max): (T, T)) -> (f64, f64) {
    (min.into(), max.into())
}

/// Validate every field of `config`.
///
/// Returns the single error when there is one, [`ValidationError::Multiple`]
/// otherwise.
pub fn validate_config(config: &AudioConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    check_range(
        &mut errors,
        "sample_rate",
        f64::from(config.sample_rate),
        widen(SAMPLE_RATE_RANGE),
    );
    check_range(
        &mut errors,
        "buffer_size",
        f64::from(config.buffer_size),
        widen(BUFFER_SIZE_RANGE),
    );
    check_range(
        &mut errors,
        "channels",
        f64::from(config.channels),
        widen(CHANNELS_RANGE),
    );
    check_range(&mut errors, "volume", f64::from(config.volume), (0.0, 1.0));
    if let Some(device) = &config.device
        && device.trim().is_empty()
    {
        errors.push(ValidationError::Empty("device".to_string()));
    }

    let synth = &config.synth;
    check_range(
        &mut errors,
        "synth.pool_capacity",
        synth.pool_capacity as f64,
        (
            POOL_CAPACITY_RANGE.0 as f64,
            POOL_CAPACITY_RANGE.1 as f64,
        ),
    );
    check_range(
        &mut errors,
        "synth.fade_out_ms",
        synth.fade_out_ms,
        FADE_OUT_MS_RANGE,
    );
    check_range(
        &mut errors,
        "synth.amplitude",
        f64::from(synth.amplitude),
        widen(AMPLITUDE_RANGE),
    );

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
