//! Error types for the tone engine.

use thiserror::Error;

/// Errors raised while constructing a mixer or engine.
///
/// Nothing on the audio thread returns an error: once an engine exists, every
/// render call is total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthError {
    /// An [`EngineParams`](crate::EngineParams) field is out of range.
    #[error("invalid engine parameter `{field}`: {reason}")]
    InvalidParams {
        /// Offending field name.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl SynthError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidParams { field, reason }
    }
}

/// Result alias for tone engine construction.
pub type Result<T> = std::result::Result<T, SynthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = SynthError::invalid("sample_rate", "must be non-zero");
        assert_eq!(
            err.to_string(),
            "invalid engine parameter `sample_rate`: must be non-zero"
        );
    }
}
