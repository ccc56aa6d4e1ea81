//! tilemount - MBTiles tile stores as read-only filesystems
//!
//! Exposes the tiles of an MBTiles file as a `/{zoom}/{column}/{row}.{ext}`
//! directory tree through FUSE, with rows flipped from the store's TMS
//! order to the XYZ order web maps use.
//!
//! # High-Level API
//!
//! ```ignore
//! use tilemount::service::{MountConfig, MountService};
//!
//! let config = MountConfig::new("/data/world.mbtiles", "/mnt/tiles");
//! MountService::serve(&config).await?;
//! ```
//!
//! The filesystem core can also be driven directly, without a mount:
//!
//! ```
//! use std::sync::Arc;
//! use tilemount::fuse::{TileFs, TileFsOptions};
//! use tilemount::store::MemoryTileStore;
//!
//! let store = MemoryTileStore::new().with_tile(2, 1, 1, b"tile".to_vec());
//! let fs = TileFs::init_quiet(Arc::new(store), TileFsOptions::default()).unwrap();
//!
//! let mut buf = [0u8; 16];
//! assert_eq!(fs.read("/2/1/2.png", 0, &mut buf), Ok(4));
//! ```

pub mod accessor;
pub mod config;
pub mod coord;
pub mod fuse;
pub mod log;
pub mod logging;
pub mod namespace;
pub mod service;
pub mod store;

/// Version of the tilemount library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
