//! Tile store errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for tile store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a [`TileStore`](super::TileStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file could not be opened
    #[error("Failed to open tile store {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    /// The file opened but is not a tile store
    #[error("Invalid tile store schema: {0}")]
    InvalidSchema(String),

    /// A query failed to execute
    #[error("Tile store query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// The store has been closed
    #[error("Tile store is closed")]
    Closed,
}
