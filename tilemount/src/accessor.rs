//! Tree-space view of a tile store.
//!
//! [`TileAccessor`] is the only place that converts rows between the
//! store's numbering and the tree's. Callers pass and receive tree rows.

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;

use crate::coord::{to_storage_row, to_tree_row};
use crate::log::{Logger, NoOpLogger};
use crate::store::{StoreError, TileStore};
use crate::{log_debug, log_warn};

/// Errors from accessor queries.
#[derive(Debug, Error)]
pub enum AccessError {
    /// No tile at the requested coordinate
    #[error("Tile {zoom}/{column}/{row} not found")]
    NotFound { zoom: u8, column: u32, row: u32 },

    /// The store could not answer the query
    #[error("Tile store unavailable: {0}")]
    BackendUnavailable(#[from] StoreError),
}

/// Tile store queries expressed in tree-space rows.
#[derive(Clone)]
pub struct TileAccessor {
    store: Arc<dyn TileStore>,
    logger: Arc<dyn Logger>,
}

impl TileAccessor {
    pub fn new(store: Arc<dyn TileStore>) -> Self {
        Self {
            store,
            logger: Arc::new(NoOpLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// The wrapped store.
    pub fn store(&self) -> &Arc<dyn TileStore> {
        &self.store
    }

    /// Fetches one tile.
    ///
    /// # Arguments
    ///
    /// * `zoom` - Zoom level
    /// * `column` - Column
    /// * `row` - Tree-space row
    ///
    /// # Errors
    ///
    /// [`AccessError::NotFound`] if the store has no such tile or `row` is
    /// outside the zoom level's grid; [`AccessError::BackendUnavailable`]
    /// if the query fails.
    pub fn get_tile(&self, zoom: u8, column: u32, row: u32) -> Result<Vec<u8>, AccessError> {
        let not_found = AccessError::NotFound { zoom, column, row };
        let Some(storage_row) = to_storage_row(zoom, row) else {
            log_debug!(
                self.logger,
                "Row {} outside grid at zoom {}, treating as missing",
                row,
                zoom
            );
            return Err(not_found);
        };

        self.store
            .tile(zoom, column, storage_row)?
            .ok_or(not_found)
    }

    /// Distinct zoom levels in the store.
    pub fn list_zooms(&self) -> Result<BTreeSet<u8>, AccessError> {
        Ok(self.store.zoom_levels()?)
    }

    /// Distinct columns at `zoom`.
    pub fn list_columns(&self, zoom: u8) -> Result<BTreeSet<u32>, AccessError> {
        Ok(self.store.columns(zoom)?)
    }

    /// Distinct tree-space rows at `(zoom, column)`.
    ///
    /// Stored rows that fall outside the zoom level's grid cannot be
    /// addressed through the tree and are skipped with a warning.
    pub fn list_rows(&self, zoom: u8, column: u32) -> Result<BTreeSet<u32>, AccessError> {
        let stored = self.store.rows(zoom, column)?;
        let mut rows = BTreeSet::new();
        for storage_row in stored {
            match to_tree_row(zoom, storage_row) {
                Some(row) => {
                    rows.insert(row);
                }
                None => log_warn!(
                    self.logger,
                    "Skipping tile {}/{} with stored row {} outside grid",
                    zoom,
                    column,
                    storage_row
                ),
            }
        }
        Ok(rows)
    }
}
