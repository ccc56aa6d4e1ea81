//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Mount settings
    pub mount: MountSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// How tiles are presented in the mounted tree.
#[derive(Debug, Clone, PartialEq)]
pub struct MountSettings {
    /// Tile file extension; `None` derives it from the store's `format`
    pub extension: Option<String>,
    /// Treat tile names with a different extension as missing
    pub strict_extension: bool,
    /// Seconds the kernel may cache attributes and entries
    pub attr_ttl: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
