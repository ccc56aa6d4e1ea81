//! Reading and writing `~/.tilemount/config.ini`.
//!
//! Settings structs live in [`super::settings`], defaults in
//! [`super::defaults`], key mapping in [`super::parser`] and the commented
//! output in [`super::writer`].

use ini::Ini;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// A config file named on the command line does not exist
    #[error("Config file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A key holds a value of the wrong shape
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    /// Loads `~/.tilemount/config.ini`, or defaults if it is absent.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Loads `path`, or defaults if it is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        super::parser::parse_ini(&ini)
    }

    /// Loads an explicitly chosen file, which must exist, or else the
    /// default file.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigFileError> {
        match explicit {
            Some(path) if !path.is_file() => Err(ConfigFileError::Missing(path.to_path_buf())),
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Writes the configuration as commented INI, creating parent
    /// directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        let write_err = |source| ConfigFileError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, super::writer::to_config_string(self)).map_err(write_err)
    }

    /// Writes a default config to `path` unless a file is already there.
    ///
    /// Returns `true` if a file was written.
    pub fn ensure_exists_at(path: &Path) -> Result<bool, ConfigFileError> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        Ok(true)
    }
}

/// `~/.tilemount`, or `./.tilemount` without a home directory.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tilemount")
}

/// `~/.tilemount/config.ini`.
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
