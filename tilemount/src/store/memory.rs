//! In-memory tile store.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use super::error::{StoreError, StoreResult};
use super::info::TileStoreInfo;
use super::TileStore;

/// Tile store backed by a map, keyed by storage rows.
///
/// # Example
///
/// ```
/// use tilemount::store::{MemoryTileStore, TileStore};
///
/// let store = MemoryTileStore::new()
///     .with_metadata("format", "png")
///     .with_tile(2, 1, 1, b"tile".to_vec());
///
/// assert_eq!(store.tile(2, 1, 1).unwrap(), Some(b"tile".to_vec()));
/// assert_eq!(store.info().unwrap().extension(), Some("png"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryTileStore {
    tiles: BTreeMap<(u8, u32, u32), Vec<u8>>,
    metadata: Vec<(String, String)>,
    modified: Option<SystemTime>,
    closed: AtomicBool,
}

impl MemoryTileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tile at a storage-space row.
    pub fn with_tile(mut self, zoom: u8, column: u32, storage_row: u32, data: Vec<u8>) -> Self {
        self.tiles.insert((zoom, column, storage_row), data);
        self
    }

    /// Adds one metadata entry.
    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((name.into(), value.into()));
        self
    }

    pub fn with_modified(mut self, modified: SystemTime) -> Self {
        self.modified = Some(modified);
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.is_closed() {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

impl TileStore for MemoryTileStore {
    fn info(&self) -> StoreResult<TileStoreInfo> {
        self.ensure_open()?;
        let mut info = TileStoreInfo::from_metadata(self.metadata.iter().cloned());
        let zooms = self.tiles.keys().map(|(z, _, _)| *z);
        info.minzoom = info.minzoom.or(zooms.clone().min());
        info.maxzoom = info.maxzoom.or(zooms.max());
        Ok(info)
    }

    fn zoom_levels(&self) -> StoreResult<BTreeSet<u8>> {
        self.ensure_open()?;
        Ok(self.tiles.keys().map(|(z, _, _)| *z).collect())
    }

    fn columns(&self, zoom: u8) -> StoreResult<BTreeSet<u32>> {
        self.ensure_open()?;
        Ok(self
            .tiles
            .range((zoom, 0, 0)..=(zoom, u32::MAX, u32::MAX))
            .map(|((_, x, _), _)| *x)
            .collect())
    }

    fn rows(&self, zoom: u8, column: u32) -> StoreResult<BTreeSet<u32>> {
        self.ensure_open()?;
        Ok(self
            .tiles
            .range((zoom, column, 0)..=(zoom, column, u32::MAX))
            .map(|((_, _, y), _)| *y)
            .collect())
    }

    fn tile(&self, zoom: u8, column: u32, storage_row: u32) -> StoreResult<Option<Vec<u8>>> {
        self.ensure_open()?;
        Ok(self.tiles.get(&(zoom, column, storage_row)).cloned())
    }

    fn close(&self) -> StoreResult<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }

    fn modified(&self) -> Option<SystemTime> {
        self.modified
    }
}
