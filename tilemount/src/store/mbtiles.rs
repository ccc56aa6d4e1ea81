//! MBTiles backend.
//!
//! An MBTiles file is an SQLite database with a `tiles(zoom_level,
//! tile_column, tile_row, tile_data)` table (often a view over
//! deduplicated images) and a `metadata(name, value)` table. Rows are
//! stored in TMS order, south to north.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;
use rusqlite::types::Value;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use super::error::{StoreError, StoreResult};
use super::info::TileStoreInfo;
use super::TileStore;
use crate::log::{Logger, NoOpLogger};
use crate::log_warn;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// MBTiles file opened read-only.
///
/// The connection sits behind a mutex, so concurrent callers are
/// serialized on it. Closing drops the connection; later queries fail with
/// [`StoreError::Closed`].
pub struct MbtilesStore {
    conn: Mutex<Option<Connection>>,
    path: PathBuf,
    modified: Option<SystemTime>,
    logger: Arc<dyn Logger>,
}

impl MbtilesStore {
    /// Opens an MBTiles file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the file cannot be opened as SQLite,
    /// and [`StoreError::InvalidSchema`] if it has no `tiles` table or view.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let open_err = |reason: String| StoreError::Open {
            path: path.clone(),
            reason,
        };

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| open_err(e.to_string()))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| open_err(e.to_string()))?;

        // SQLite opens lazily; this is the first real read of the file.
        let has_tiles: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master \
                 WHERE name = 'tiles' AND type IN ('table', 'view')",
                [],
                |row| row.get(0),
            )
            .map_err(|e| open_err(e.to_string()))?;
        if !has_tiles {
            return Err(StoreError::InvalidSchema(format!(
                "{} has no tiles table",
                path.display()
            )));
        }

        let modified = std::fs::metadata(&path).and_then(|m| m.modified()).ok();

        Ok(Self {
            conn: Mutex::new(Some(conn)),
            path,
            modified,
            logger: Arc::new(NoOpLogger),
        })
    }

    /// Reports skipped rows to `logger`.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Path the store was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `f` against the open connection.
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> StoreResult<T> {
        let guard = self.conn.lock();
        let conn = guard.as_ref().ok_or(StoreError::Closed)?;
        Ok(f(conn)?)
    }

    /// Collects one integer column into a set of `T`.
    ///
    /// Values that are not integers, or do not fit `T` (a negative row, a
    /// zoom level above 255), are skipped with a warning so the rest of
    /// the listing survives.
    fn distinct<T>(
        &self,
        column: &str,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> StoreResult<BTreeSet<T>>
    where
        T: TryFrom<i64> + Ord,
    {
        let raw: Vec<Value> = self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(sql)?;
            let values = stmt.query_map(params, |row| row.get(0))?;
            values.collect()
        })?;

        let mut values = BTreeSet::new();
        for value in raw {
            match value {
                Value::Integer(n) => match T::try_from(n) {
                    Ok(v) => {
                        values.insert(v);
                    }
                    Err(_) => log_warn!(
                        self.logger,
                        "Skipping {} {} in {}: out of range",
                        column,
                        n,
                        self.path.display()
                    ),
                },
                other => log_warn!(
                    self.logger,
                    "Skipping non-integer {} {:?} in {}",
                    column,
                    other,
                    self.path.display()
                ),
            }
        }
        Ok(values)
    }
}

impl TileStore for MbtilesStore {
    fn info(&self) -> StoreResult<TileStoreInfo> {
        self.with_conn(|conn| {
            let has_metadata: bool = conn.query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master \
                 WHERE name = 'metadata' AND type IN ('table', 'view')",
                [],
                |row| row.get(0),
            )?;

            let mut info = if has_metadata {
                let mut stmt = conn.prepare("SELECT name, value FROM metadata")?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                TileStoreInfo::from_metadata(rows)
            } else {
                TileStoreInfo::default()
            };

            if info.minzoom.is_none() || info.maxzoom.is_none() {
                let (min, max): (Option<i64>, Option<i64>) = conn.query_row(
                    "SELECT MIN(zoom_level), MAX(zoom_level) FROM tiles \
                     WHERE zoom_level BETWEEN 0 AND 255",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )?;
                info.minzoom = info.minzoom.or(min.and_then(|z| u8::try_from(z).ok()));
                info.maxzoom = info.maxzoom.or(max.and_then(|z| u8::try_from(z).ok()));
            }

            Ok(info)
        })
    }

    fn zoom_levels(&self) -> StoreResult<BTreeSet<u8>> {
        self.distinct("zoom_level", "SELECT DISTINCT zoom_level FROM tiles", [])
    }

    fn columns(&self, zoom: u8) -> StoreResult<BTreeSet<u32>> {
        self.distinct(
            "tile_column",
            "SELECT DISTINCT tile_column FROM tiles WHERE zoom_level = ?1",
            params![zoom],
        )
    }

    fn rows(&self, zoom: u8, column: u32) -> StoreResult<BTreeSet<u32>> {
        self.distinct(
            "tile_row",
            "SELECT DISTINCT tile_row FROM tiles WHERE zoom_level = ?1 AND tile_column = ?2",
            params![zoom, column],
        )
    }

    fn tile(&self, zoom: u8, column: u32, storage_row: u32) -> StoreResult<Option<Vec<u8>>> {
        self.with_conn(|conn| {
            conn.prepare_cached(
                "SELECT tile_data FROM tiles \
                 WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3",
            )?
            .query_row(params![zoom, column, storage_row], |row| row.get(0))
            .optional()
        })
    }

    fn close(&self) -> StoreResult<()> {
        let Some(conn) = self.conn.lock().take() else {
            return Ok(());
        };
        conn.close().map_err(|(_, e)| StoreError::Query(e))
    }

    fn modified(&self) -> Option<SystemTime> {
        self.modified
    }
}
