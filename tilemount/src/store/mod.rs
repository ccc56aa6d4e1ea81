//! Tile storage backends.
//!
//! The filesystem reads tiles through the [`TileStore`] trait. Rows passed
//! to and returned from a store are always in the store's own numbering
//! (bottom-up for MBTiles); conversion to the tree numbering happens in
//! [`crate::accessor`].
//!
//! Two implementations are provided:
//!
//! - [`MbtilesStore`]: an MBTiles (SQLite) file opened read-only
//! - [`MemoryTileStore`]: an in-memory map, used in tests and demos

mod error;
mod info;
mod mbtiles;
mod memory;

pub use error::{StoreError, StoreResult};
pub use info::{TileFormat, TileStoreInfo};
pub use mbtiles::MbtilesStore;
pub use memory::MemoryTileStore;

use std::collections::BTreeSet;
use std::time::SystemTime;

/// Read-only access to a tile pyramid.
///
/// Implementations must be safe to call from many threads at once; any
/// locking they need is their own business. After [`close`](Self::close)
/// every query fails with [`StoreError::Closed`].
pub trait TileStore: Send + Sync {
    /// Pyramid metadata.
    fn info(&self) -> StoreResult<TileStoreInfo>;

    /// Distinct zoom levels present in the store.
    fn zoom_levels(&self) -> StoreResult<BTreeSet<u8>>;

    /// Distinct columns present at `zoom`.
    fn columns(&self, zoom: u8) -> StoreResult<BTreeSet<u32>>;

    /// Distinct storage rows present at `(zoom, column)`.
    fn rows(&self, zoom: u8, column: u32) -> StoreResult<BTreeSet<u32>>;

    /// Payload of one tile, `None` if the store has no such tile.
    fn tile(&self, zoom: u8, column: u32, storage_row: u32) -> StoreResult<Option<Vec<u8>>>;

    /// Releases the underlying handle. Calling it twice is harmless.
    fn close(&self) -> StoreResult<()>;

    /// Last modification time of the backing data, if known.
    fn modified(&self) -> Option<SystemTime> {
        None
    }
}
