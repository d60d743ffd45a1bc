//! Settings file failures.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::validation::ValidationError;

/// Why a settings file could not be loaded or saved.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file is missing or unreadable.
    #[error("cannot read settings file '{path}': {source}")]
    Read {
        /// File that was asked for.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: io::Error,
    },

    /// The settings file could not be written.
    #[error("cannot write settings file '{path}': {source}")]
    Write {
        /// File being saved.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: io::Error,
    },

    /// The directory meant to hold the settings file could not be made.
    #[error("cannot create settings directory '{path}': {source}")]
    CreateDir {
        /// Directory being created.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: io::Error,
    },

    /// Not valid TOML, or a key holds the wrong kind of value.
    #[error("invalid settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Settings could not be turned back into TOML.
    #[error("cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Well-formed TOML with values out of range.
    #[error("invalid settings: {0}")]
    Invalid(#[from] ValidationError),
}

impl ConfigError {
    pub(crate) fn reading(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn writing(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn creating_dir(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::CreateDir {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The file or directory involved, for I/O failures.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } | Self::CreateDir { path, .. } => {
                Some(path.as_path())
            }
            Self::Parse(_) | Self::Serialize(_) | Self::Invalid(_) => None,
        }
    }
}
