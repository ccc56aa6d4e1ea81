//! FUSE filesystem mounting service.
//!
//! Brings a tile store up as a mounted filesystem: validates the paths,
//! opens the store, mounts it through fuse3 and keeps it mounted until
//! it is unmounted from outside or the process receives Ctrl+C.
//!
//! # Example
//!
//! ```ignore
//! use tilemount::service::{MountConfig, MountService};
//!
//! let config = MountConfig::new("/data/world.mbtiles", "/mnt/tiles")
//!     .with_extension("png")
//!     .with_ttl(Duration::from_secs(5));
//!
//! MountService::prepare_mountpoint(config.mountpoint())?;
//! MountService::serve_blocking(&config, &runtime_handle)?;
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::fuse::fuse3::{Fuse3TileFs, TTL};
use crate::fuse::{TileFs, TileFsOptions};
use crate::log::{Logger, NoOpLogger};
use crate::{log_debug, log_info, log_warn};

use super::error::ServiceError;

/// Configuration for mounting a tile store.
#[derive(Clone)]
pub struct MountConfig {
    store: PathBuf,
    mountpoint: PathBuf,
    extension: Option<String>,
    strict_extension: bool,
    ttl: Duration,
    logger: Option<Arc<dyn Logger>>,
}

impl MountConfig {
    /// Create a new mount configuration.
    ///
    /// # Arguments
    ///
    /// * `store` - Path to the MBTiles file
    /// * `mountpoint` - Directory the tile tree is mounted on
    pub fn new(store: impl Into<PathBuf>, mountpoint: impl Into<PathBuf>) -> Self {
        Self {
            store: store.into(),
            mountpoint: mountpoint.into(),
            extension: None,
            strict_extension: false,
            ttl: TTL,
            logger: None,
        }
    }

    /// Override the tile extension derived from the store.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn with_strict_extension(mut self, strict: bool) -> Self {
        self.strict_extension = strict;
        self
    }

    /// Set the attribute and entry cache TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the logger for diagnostic messages.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn store(&self) -> &Path {
        &self.store
    }

    pub fn mountpoint(&self) -> &Path {
        &self.mountpoint
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn is_strict_extension(&self) -> bool {
        self.strict_extension
    }

    fn fs_options(&self) -> TileFsOptions {
        let options = TileFsOptions::default().with_strict_extension(self.strict_extension);
        match &self.extension {
            Some(ext) => options.with_extension(ext.clone()),
            None => options,
        }
    }

    fn logger(&self) -> Arc<dyn Logger> {
        self.logger
            .clone()
            .unwrap_or_else(|| Arc::new(NoOpLogger))
    }
}

/// Service for mounting tile stores.
pub struct MountService;

impl MountService {
    /// Validate that the store is a file and the mountpoint a directory.
    ///
    /// # Returns
    ///
    /// Tuple of (store_path, mountpoint_path) on success.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidStore` or `ServiceError::InvalidMountpoint`.
    pub fn validate_paths(
        store: &Path,
        mountpoint: &Path,
    ) -> Result<(PathBuf, PathBuf), ServiceError> {
        if !store.exists() {
            return Err(ServiceError::InvalidStore(format!(
                "{} does not exist",
                store.display()
            )));
        }
        if !store.is_file() {
            return Err(ServiceError::InvalidStore(format!(
                "{} is not a file",
                store.display()
            )));
        }

        if !mountpoint.is_dir() {
            return Err(ServiceError::InvalidMountpoint(format!(
                "{} is not a directory",
                mountpoint.display()
            )));
        }

        Ok((store.to_path_buf(), mountpoint.to_path_buf()))
    }

    /// Create the mountpoint directory if it is absent.
    pub fn prepare_mountpoint(mountpoint: &Path) -> Result<(), ServiceError> {
        match std::fs::create_dir(mountpoint) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Open the store, mount it, and serve until unmounted (async).
    ///
    /// Returns once the filesystem has been unmounted, either from
    /// outside (`fusermount -u`) or after Ctrl+C.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The paths are invalid
    /// - The store cannot be opened as MBTiles
    /// - The FUSE mount fails
    pub async fn serve(config: &MountConfig) -> Result<(), ServiceError> {
        let (store_path, mount_path) = Self::validate_paths(config.store(), config.mountpoint())?;
        let logger = config.logger();

        let core = Arc::new(TileFs::open_mbtiles(
            &store_path,
            config.fs_options(),
            Arc::clone(&logger),
        )?);

        log_info!(
            logger,
            "Mounting {} at {}",
            store_path.display(),
            mount_path.display()
        );
        let fs = Fuse3TileFs::new(Arc::clone(&core)).with_ttl(config.ttl());
        let mut handle = fs.mount(&mount_path).await?;
        log_info!(
            logger,
            "Mounted; press Ctrl+C or run 'fusermount -u {}' to stop",
            handle.mountpoint().display()
        );

        tokio::select! {
            result = &mut handle => {
                result?;
                log_info!(logger, "Filesystem unmounted");
            }
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    log_info!(logger, "Interrupted, unmounting {}", mount_path.display());
                    handle.unmount().await?;
                }
                Err(e) => {
                    log_warn!(logger, "Failed to listen for Ctrl+C, waiting for unmount: {}", e);
                    handle.await?;
                }
            },
        }

        core.shutdown();
        log_debug!(logger, "Mount service finished");
        Ok(())
    }

    /// Open the store, mount it, and serve until unmounted (blocking).
    ///
    /// Blocks the calling thread on `runtime_handle`. Suitable for CLI
    /// applications.
    pub fn serve_blocking(config: &MountConfig, runtime_handle: &Handle) -> Result<(), ServiceError> {
        runtime_handle.block_on(Self::serve(config))
    }
}
