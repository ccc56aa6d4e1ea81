//! Default values and constants for all configuration settings.

use std::path::PathBuf;

use super::settings::*;

/// Default attribute and entry cache TTL in seconds.
pub const DEFAULT_ATTR_TTL_SECS: u64 = 1;

/// Default log file path, `~/.tilemount/tilemount.log`.
pub fn default_log_file() -> PathBuf {
    crate::logging::default_log_path()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            mount: MountSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for MountSettings {
    fn default() -> Self {
        Self {
            extension: None,
            strict_extension: false,
            attr_ttl: DEFAULT_ATTR_TTL_SECS,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}
