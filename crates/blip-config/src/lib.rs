//! Audio settings for the blip tone engine.
//!
//! One TOML file controls how sound is opened (device, rate, format, volume)
//! and how the mixer behaves (pool size, fade, phase strategy, late notes).
//! Missing keys take the engine defaults, and every value is range checked on
//! load.
//!
//! # Example
//!
//! ```rust,no_run
//! use blip_config::{AudioConfig, find_config, user_config_path};
//!
//! let config = match find_config(None) {
//!     Some(path) => AudioConfig::load(path).unwrap(),
//!     None => AudioConfig::default(),
//! };
//! let params = config.to_engine_params();
//! assert_eq!(params.pool_capacity, config.synth.pool_capacity);
//!
//! config.save(user_config_path()).unwrap();
//! ```

mod error;
mod settings;

/// Platform-specific paths for the settings file.
#[cfg(feature = "std")]
pub mod paths;

/// Range checks for settings.
pub mod validation;

pub use error::ConfigError;
#[cfg(feature = "std")]
pub use paths::{
    CONFIG_FILE_NAME, LOCAL_CONFIG_FILE_NAME, ensure_user_config_dir, find_config,
    user_config_dir, user_config_path,
};
pub use settings::{
    AudioConfig, LateNotes, PcmFormat, PhaseSetting, StopSetting, SynthConfig,
};
pub use validation::{ValidationError, ValidationResult, validate_config};
