//! Where the settings file lives.
//!
//! - **User config**: `~/.config/blip/config.toml` (Linux),
//!   `~/Library/Application Support/blip/config.toml` (macOS),
//!   `%APPDATA%\blip\config.toml` (Windows)
//! - **Project override**: `blip.toml` in the working directory, which wins
//!   over the user file.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const APP_NAME: &str = "blip";

/// File name inside the user config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE_NAME: &str = "blip.toml";

/// Returns the user-specific configuration directory.
///
/// Falls back to the working directory when the platform has none.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the path of the user settings file, whether or not it exists.
pub fn user_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE_NAME)
}

/// Locate the settings file to load.
///
/// An explicit path is returned as-is if it names a file. Otherwise
/// `blip.toml` in the working directory is tried, then the user file.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.is_file().then(|| path.to_path_buf());
    }
    find_config_in(Path::new("."), &user_config_path())
}

fn find_config_in(cwd: &Path, user_path: &Path) -> Option<PathBuf> {
    let local = cwd.join(LOCAL_CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    user_path.is_file().then(|| user_path.to_path_buf())
}

/// Ensure the user config directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(ConfigError::creating_dir(&dir))?;
    }

    Ok(dir)
}
