//! Configuration for tilemount.
//!
//! Settings come from `~/.tilemount/config.ini` and are overridden by
//! command-line flags.
//!
//! # Example
//!
//! ```
//! use tilemount::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.mount.attr_ttl, 1);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use defaults::{default_log_file, DEFAULT_ATTR_TTL_SECS};
pub use settings::{ConfigFile, LoggingSettings, MountSettings};
