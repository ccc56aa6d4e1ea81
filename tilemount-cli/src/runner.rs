//! CLI runner for common setup.
//!
//! Encapsulates config loading, logging initialization and building the
//! mount configuration from config file values and command-line flags.

use crate::error::CliError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tilemount::config::ConfigFile;
use tilemount::coord::is_valid_extension;
use tilemount::log::TracingLogger;
use tilemount::logging::{init_logging, LoggingGuard, LoggingOptions};
use tilemount::service::MountConfig;

/// Mount settings given on the command line.
#[derive(Debug, Default)]
pub struct MountOverrides {
    pub extension: Option<String>,
    pub strict_extension: bool,
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load config and initialize logging.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Config file to load instead of `~/.tilemount/config.ini`
    /// * `debug_mode` - When true, enables debug-level logging regardless of config
    /// * `stdout` - Mirror log output to stdout
    pub fn new(config_path: Option<&Path>, debug_mode: bool, stdout: bool) -> Result<Self, CliError> {
        let config = ConfigFile::resolve(config_path)?;

        let logging_guard = init_logging(&LoggingOptions {
            file: config.logging.file.clone(),
            stdout,
            debug: debug_mode,
        })
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Log startup information.
    pub fn log_startup(&self, store: &Path, mountpoint: &Path) {
        info!("tilemount v{}", tilemount::VERSION);
        info!(
            store = %store.display(),
            mountpoint = %mountpoint.display(),
            log_file = %self.config.logging.file.display(),
            "Starting mount"
        );
    }

    /// Build the mount configuration; command-line flags win over the file.
    pub fn mount_config(
        &self,
        store: PathBuf,
        mountpoint: PathBuf,
        overrides: &MountOverrides,
    ) -> Result<MountConfig, CliError> {
        Ok(build_mount_config(&self.config, store, mountpoint, overrides)?
            .with_logger(Arc::new(TracingLogger::new())))
    }
}

fn build_mount_config(
    config: &ConfigFile,
    store: PathBuf,
    mountpoint: PathBuf,
    overrides: &MountOverrides,
) -> Result<MountConfig, CliError> {
    let mount = MountConfig::new(store, mountpoint)
        .with_strict_extension(overrides.strict_extension || config.mount.strict_extension)
        .with_ttl(Duration::from_secs(config.mount.attr_ttl));

    if let Some(flag) = overrides.extension.as_deref() {
        let ext = flag.trim_start_matches('.');
        if !is_valid_extension(ext) {
            return Err(CliError::Usage(format!(
                "--extension '{}' must be alphanumeric, like 'png' or 'pbf'",
                flag
            )));
        }
        return Ok(mount.with_extension(ext));
    }

    Ok(match config.mount.extension.as_deref() {
        Some(ext) => mount.with_extension(ext),
        None => mount,
    })
}
