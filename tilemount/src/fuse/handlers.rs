//! Filesystem operations over a tile store.
//!
//! [`TileFs`] implements each operation as a plain method taking a path.
//! It holds no per-request state, so the dispatcher may call it from as
//! many threads as it likes.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::accessor::{AccessError, TileAccessor};
use crate::coord::{column_entry_name, tile_file_name, zoom_entry_name};
use crate::fuse::attr::{DirEntry, NodeAttr};
use crate::fuse::error::{FsError, InitError};
use crate::log::{Logger, NoOpLogger};
use crate::namespace::{NamespaceResolver, Node};
use crate::store::{MbtilesStore, TileStore, TileStoreInfo};
use crate::{log_debug, log_info, log_warn};

/// Extension used when neither the options nor the store name one.
pub const DEFAULT_EXTENSION: &str = "png";

/// Options for [`TileFs::init`].
#[derive(Debug, Clone, Default)]
pub struct TileFsOptions {
    /// Overrides the extension derived from the store's `format`
    pub extension: Option<String>,
    /// Refuse tile names whose extension differs from the store's
    pub strict_extension: bool,
}

impl TileFsOptions {
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn with_strict_extension(mut self, strict: bool) -> Self {
        self.strict_extension = strict;
        self
    }
}

/// Read-only filesystem view of a tile store.
///
/// ```text
/// /
/// ├── 0/
/// │   └── 0/
/// │       └── 0.png
/// └── 2/
///     ├── 1/
///     │   ├── 2.png
///     │   └── 3.png
///     └── 3/
///         └── 0.png
/// ```
pub struct TileFs {
    accessor: TileAccessor,
    resolver: NamespaceResolver,
    info: TileStoreInfo,
    mtime: SystemTime,
    shut_down: AtomicBool,
    logger: Arc<dyn Logger>,
}

impl TileFs {
    /// Opens an MBTiles file and initializes the filesystem over it.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened as an MBTiles store.
    pub fn open_mbtiles(
        path: &Path,
        options: TileFsOptions,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, InitError> {
        log_info!(logger, "Opening tile store {}", path.display());
        let store = MbtilesStore::open(path)?.with_logger(Arc::clone(&logger));
        Self::init(Arc::new(store), options, logger)
    }

    /// Initializes the filesystem over an open store.
    ///
    /// Reads and logs the pyramid metadata and settles the tile extension:
    /// the configured override, else the store's declared format, else
    /// [`DEFAULT_EXTENSION`].
    ///
    /// # Errors
    ///
    /// Fails if the store's metadata cannot be read; the filesystem must
    /// not be mounted in that case.
    pub fn init(
        store: Arc<dyn TileStore>,
        options: TileFsOptions,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, InitError> {
        let info = store.info()?;
        log_info!(logger, "Tile store initialized: {}", info);
        for (key, value) in &info.extra {
            log_debug!(logger, "  metadata {} = {}", key, value);
        }

        let extension = options
            .extension
            .clone()
            .or_else(|| info.extension().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        log_info!(
            logger,
            "Serving tiles as *.{}{}",
            extension,
            if options.strict_extension { " (strict)" } else { "" }
        );

        let mtime = store.modified().unwrap_or_else(SystemTime::now);
        let resolver =
            NamespaceResolver::new(extension).with_strict_extension(options.strict_extension);
        let accessor = TileAccessor::new(store).with_logger(Arc::clone(&logger));

        Ok(Self {
            accessor,
            resolver,
            info,
            mtime,
            shut_down: AtomicBool::new(false),
            logger,
        })
    }

    /// Initializes without logging.
    pub fn init_quiet(store: Arc<dyn TileStore>, options: TileFsOptions) -> Result<Self, InitError> {
        Self::init(store, options, Arc::new(NoOpLogger))
    }

    /// Metadata read at startup.
    pub fn info(&self) -> &TileStoreInfo {
        &self.info
    }

    /// Extension appended to tile names.
    pub fn extension(&self) -> &str {
        self.resolver.extension()
    }

    /// Classifies a path.
    pub fn resolve(&self, path: &str) -> Node {
        self.resolver.resolve(path)
    }

    /// Attributes of the node at `path`.
    ///
    /// Directories always exist; a tile exists if the store has it.
    pub fn getattr(&self, path: &str) -> Result<NodeAttr, FsError> {
        match self.resolve(path) {
            Node::Root | Node::ZoomDir { .. } | Node::ColumnDir { .. } => {
                Ok(NodeAttr::directory(self.mtime))
            }
            Node::TileFile { zoom, column, row } => {
                let tile = self
                    .accessor
                    .get_tile(zoom, column, row)
                    .map_err(|e| self.fetch_error("getattr", path, e))?;
                Ok(NodeAttr::file(tile.len() as u64, self.mtime))
            }
            Node::Invalid => Err(FsError::NotFound),
        }
    }

    /// Children of the directory at `path`, without `.` and `..`.
    pub fn readdir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let list_err = |e: AccessError| {
            log_warn!(self.logger, "readdir {} failed: {}", path, e);
            FsError::InvalidArgument
        };

        match self.resolve(path) {
            Node::Root => Ok(self
                .accessor
                .list_zooms()
                .map_err(list_err)?
                .into_iter()
                .map(|z| DirEntry::directory(zoom_entry_name(z)))
                .collect()),
            Node::ZoomDir { zoom } => Ok(self
                .accessor
                .list_columns(zoom)
                .map_err(list_err)?
                .into_iter()
                .map(|x| DirEntry::directory(column_entry_name(x)))
                .collect()),
            Node::ColumnDir { zoom, column } => Ok(self
                .accessor
                .list_rows(zoom, column)
                .map_err(list_err)?
                .into_iter()
                .map(|y| DirEntry::file(tile_file_name(y, self.extension())))
                .collect()),
            Node::TileFile { .. } => Err(FsError::InvalidArgument),
            Node::Invalid => Err(FsError::NotFound),
        }
    }

    /// Checks that `path` is a tile that can be opened for reading.
    ///
    /// Handles carry no state; the dispatcher may use 0 for all of them.
    pub fn open(&self, path: &str, flags: u32) -> Result<(), FsError> {
        match self.resolve(path) {
            Node::TileFile { zoom, column, row } => {
                if !is_read_only(flags) {
                    log_debug!(self.logger, "open {} refused: write access", path);
                    return Err(FsError::PermissionDenied);
                }
                self.accessor
                    .get_tile(zoom, column, row)
                    .map(|_| ())
                    .map_err(|e| self.fetch_error("open", path, e))
            }
            Node::Root | Node::ZoomDir { .. } | Node::ColumnDir { .. } | Node::Invalid => {
                Err(FsError::NotFound)
            }
        }
    }

    /// Reads from the tile at `path` into `buf`, starting at `offset`.
    ///
    /// Returns the number of bytes copied: `buf.len()` or fewer near the
    /// end of the tile, 0 at or past the end.
    pub fn read(&self, path: &str, offset: u64, buf: &mut [u8]) -> Result<usize, FsError> {
        match self.resolve(path) {
            Node::TileFile { zoom, column, row } => {
                let tile = self
                    .accessor
                    .get_tile(zoom, column, row)
                    .map_err(|e| self.fetch_error("read", path, e))?;
                Ok(copy_range(&tile, offset, buf))
            }
            Node::Root | Node::ZoomDir { .. } | Node::ColumnDir { .. } | Node::Invalid => {
                Err(FsError::PermissionDenied)
            }
        }
    }

    /// Releases a handle. Always succeeds.
    pub fn release(&self, path: &str) -> Result<(), FsError> {
        log_debug!(self.logger, "release {}", path);
        Ok(())
    }

    /// Answer for every write-class operation.
    pub fn reject_write(&self, op: &str, path: &str) -> FsError {
        log_debug!(self.logger, "{} {} refused: read-only filesystem", op, path);
        FsError::PermissionDenied
    }

    /// Closes the store.
    ///
    /// Errors are logged and swallowed; later calls do nothing.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            log_debug!(self.logger, "Tile store already closed");
            return;
        }
        match self.accessor.store().close() {
            Ok(()) => log_info!(self.logger, "Tile store closed"),
            Err(e) => log_warn!(self.logger, "Failed to close tile store: {}", e),
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    /// Maps a failed tile fetch; backend failures are logged first.
    fn fetch_error(&self, op: &str, path: &str, err: AccessError) -> FsError {
        match err {
            AccessError::NotFound { .. } => log_debug!(self.logger, "{} {}: {}", op, path, err),
            AccessError::BackendUnavailable(_) => {
                log_warn!(self.logger, "{} {} failed: {}", op, path, err)
            }
        }
        FsError::NotFound
    }
}

/// Copies `tile[offset..]` into `buf`, as much as fits.
fn copy_range(tile: &[u8], offset: u64, buf: &mut [u8]) -> usize {
    let Ok(start) = usize::try_from(offset) else {
        return 0;
    };
    if start >= tile.len() {
        return 0;
    }
    let n = buf.len().min(tile.len() - start);
    buf[..n].copy_from_slice(&tile[start..start + n]);
    n
}

fn is_read_only(flags: u32) -> bool {
    (flags as i32) & libc::O_ACCMODE == libc::O_RDONLY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuse::attr::NodeKind;
    use crate::log::{LogLevel, MemoryLogger};
    use crate::store::MemoryTileStore;

    const TILE: &[u8] = b"0123456789";

    /// One tile at zoom 2, column 1, storage row 1 (tree row 2).
    fn fs() -> TileFs {
        let store = MemoryTileStore::new().with_tile(2, 1, 1, TILE.to_vec());
        TileFs::init_quiet(Arc::new(store), TileFsOptions::default()).unwrap()
    }

    fn names(entries: Vec<DirEntry>) -> Vec<String> {
        let mut names: Vec<String> = entries.into_iter().map(|e| e.name).collect();
        names.sort();
        names
    }

    #[test]
    fn test_tile_fs_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TileFs>();
    }

    #[test]
    fn test_getattr_root_is_directory_even_when_empty() {
        let fs = TileFs::init_quiet(Arc::new(MemoryTileStore::new()), TileFsOptions::default())
            .unwrap();
        let attr = fs.getattr("/").unwrap();
        assert_eq!(attr.kind, NodeKind::Directory);
        assert_eq!(attr.size, 4096);
    }

    #[test]
    fn test_getattr_directories_exist_without_lookup() {
        let fs = fs();
        assert!(fs.getattr("/9").unwrap().is_dir());
        assert!(fs.getattr("/9/9").unwrap().is_dir());
    }

    #[test]
    fn test_getattr_tile_reports_length() {
        let attr = fs().getattr("/2/1/2.png").unwrap();
        assert_eq!(attr.kind, NodeKind::RegularFile);
        assert_eq!(attr.size, TILE.len() as u64);
        assert_eq!(attr.perm, 0o444);
    }

    #[test]
    fn test_getattr_unflipped_row_is_not_found() {
        assert_eq!(fs().getattr("/2/1/1.png"), Err(FsError::NotFound));
    }

    #[test]
    fn test_getattr_invalid_is_not_found() {
        let fs = fs();
        assert_eq!(fs.getattr("/abc"), Err(FsError::NotFound));
        assert_eq!(fs.getattr("/2/abc"), Err(FsError::NotFound));
        assert_eq!(fs.getattr("/2/1/abc.png"), Err(FsError::NotFound));
    }

    #[test]
    fn test_getattr_row_zero_is_a_file() {
        let store = MemoryTileStore::new().with_tile(1, 0, 1, vec![7]);
        let fs = TileFs::init_quiet(Arc::new(store), TileFsOptions::default()).unwrap();
        assert_eq!(fs.getattr("/1/0/0.png").unwrap().size, 1);
    }

    #[test]
    fn test_readdir_levels() {
        let store = MemoryTileStore::new()
            .with_tile(3, 0, 0, vec![0])
            .with_tile(3, 2, 0, vec![0])
            .with_tile(3, 5, 0, vec![0])
            .with_tile(3, 5, 7, vec![0])
            .with_tile(4, 0, 0, vec![0]);
        let fs = TileFs::init_quiet(Arc::new(store), TileFsOptions::default()).unwrap();

        assert_eq!(names(fs.readdir("/").unwrap()), ["3", "4"]);
        assert_eq!(names(fs.readdir("/3").unwrap()), ["0", "2", "5"]);
        assert_eq!(names(fs.readdir("/3/5").unwrap()), ["0.png", "7.png"]);
        assert!(fs.readdir("/3/9").unwrap().is_empty());
    }

    #[test]
    fn test_readdir_entry_kinds() {
        let fs = fs();
        assert!(fs
            .readdir("/")
            .unwrap()
            .iter()
            .all(|e| e.kind == NodeKind::Directory));
        assert_eq!(
            fs.readdir("/2/1").unwrap(),
            vec![DirEntry::file("2.png")]
        );
    }

    #[test]
    fn test_readdir_names_parse_back() {
        let fs = fs();
        for zoom in fs.readdir("/").unwrap() {
            let path = format!("/{}", zoom.name);
            assert!(matches!(fs.resolve(&path), Node::ZoomDir { .. }), "{}", path);
        }
    }

    #[test]
    fn test_readdir_tile_is_invalid_argument() {
        assert_eq!(fs().readdir("/2/1/2.png"), Err(FsError::InvalidArgument));
    }

    #[test]
    fn test_readdir_invalid_is_not_found() {
        assert_eq!(fs().readdir("/zoom"), Err(FsError::NotFound));
    }

    #[test]
    fn test_open_tile() {
        let fs = fs();
        assert_eq!(fs.open("/2/1/2.png", libc::O_RDONLY as u32), Ok(()));
        assert_eq!(fs.open("/2/1/1.png", libc::O_RDONLY as u32), Err(FsError::NotFound));
    }

    #[test]
    fn test_open_for_write_is_denied() {
        let fs = fs();
        assert_eq!(
            fs.open("/2/1/2.png", libc::O_WRONLY as u32),
            Err(FsError::PermissionDenied)
        );
        assert_eq!(
            fs.open("/2/1/2.png", libc::O_RDWR as u32),
            Err(FsError::PermissionDenied)
        );
    }

    #[test]
    fn test_open_directory_or_invalid_is_not_found() {
        let fs = fs();
        assert_eq!(fs.open("/2/1", 0), Err(FsError::NotFound));
        assert_eq!(fs.open("/x/y/z.png", 0), Err(FsError::NotFound));
    }

    #[test]
    fn test_read_whole_tile() {
        let mut buf = [0u8; 64];
        let n = fs().read("/2/1/2.png", 0, &mut buf).unwrap();
        assert_eq!(&buf[..n], TILE);
    }

    #[test]
    fn test_read_truncates_at_end() {
        let mut buf = [0u8; 8];
        let n = fs().read("/2/1/2.png", 6, &mut buf).unwrap();
        assert_eq!(n, 4);
        assert_eq!(&buf[..n], b"6789");
        assert_eq!(&buf[n..], &[0u8; 4]);
    }

    #[test]
    fn test_read_middle_chunk() {
        let mut buf = [0u8; 3];
        let n = fs().read("/2/1/2.png", 2, &mut buf).unwrap();
        assert_eq!(n, 3);
        assert_eq!(&buf, b"234");
    }

    #[test]
    fn test_read_at_or_past_end_is_empty() {
        let fs = fs();
        let mut buf = [0u8; 4];
        assert_eq!(fs.read("/2/1/2.png", 10, &mut buf), Ok(0));
        assert_eq!(fs.read("/2/1/2.png", 1_000, &mut buf), Ok(0));
        assert_eq!(fs.read("/2/1/2.png", u64::MAX, &mut buf), Ok(0));
    }

    #[test]
    fn test_read_directory_is_permission_denied() {
        let mut buf = [0u8; 4];
        assert_eq!(fs().read("/2/1", 0, &mut buf), Err(FsError::PermissionDenied));
        assert_eq!(fs().read("/", 0, &mut buf), Err(FsError::PermissionDenied));
    }

    #[test]
    fn test_read_invalid_path_is_permission_denied() {
        let fs = fs();
        let mut buf = [0u8; 4];
        assert_eq!(fs.read("/2/1/abc.png", 0, &mut buf), Err(FsError::PermissionDenied));
        assert_eq!(fs.read("/x", 0, &mut buf), Err(FsError::PermissionDenied));
        assert_eq!(buf, [0u8; 4]);
    }

    #[test]
    fn test_read_missing_tile_is_not_found() {
        let mut buf = [0u8; 4];
        assert_eq!(fs().read("/2/1/0.png", 0, &mut buf), Err(FsError::NotFound));
    }

    #[test]
    fn test_release_always_succeeds() {
        let fs = fs();
        assert_eq!(fs.release("/2/1/2.png"), Ok(()));
        assert_eq!(fs.release("/nonsense"), Ok(()));
    }

    #[test]
    fn test_reject_write() {
        assert_eq!(fs().reject_write("mkdir", "/5"), FsError::PermissionDenied);
    }

    #[test]
    fn test_extension_from_metadata() {
        let store = MemoryTileStore::new().with_metadata("format", "jpeg");
        let fs = TileFs::init_quiet(Arc::new(store), TileFsOptions::default()).unwrap();
        assert_eq!(fs.extension(), "jpg");
    }

    #[test]
    fn test_extension_override_wins() {
        let store = MemoryTileStore::new()
            .with_metadata("format", "jpg")
            .with_tile(0, 0, 0, vec![1]);
        let options = TileFsOptions::default().with_extension("webp");
        let fs = TileFs::init_quiet(Arc::new(store), options).unwrap();
        assert_eq!(fs.extension(), "webp");
        assert_eq!(names(fs.readdir("/0/0").unwrap()), ["0.webp"]);
    }

    #[test]
    fn test_unusable_format_falls_back_to_default() {
        let store = MemoryTileStore::new()
            .with_metadata("format", "image/png")
            .with_tile(0, 0, 0, vec![1]);
        let fs = TileFs::init_quiet(Arc::new(store), TileFsOptions::default()).unwrap();

        assert_eq!(fs.extension(), DEFAULT_EXTENSION);
        assert_eq!(names(fs.readdir("/0/0").unwrap()), ["0.png"]);
    }

    #[test]
    fn test_extension_default() {
        let fs = TileFs::init_quiet(Arc::new(MemoryTileStore::new()), TileFsOptions::default())
            .unwrap();
        assert_eq!(fs.extension(), DEFAULT_EXTENSION);
    }

    #[test]
    fn test_lenient_extension_accepts_any_suffix() {
        let fs = fs();
        assert!(fs.getattr("/2/1/2.jpg").is_ok());
        assert!(fs.getattr("/2/1/2").is_ok());
    }

    #[test]
    fn test_strict_extension_rejects_mismatch() {
        let store = MemoryTileStore::new().with_tile(2, 1, 1, TILE.to_vec());
        let options = TileFsOptions::default().with_strict_extension(true);
        let fs = TileFs::init_quiet(Arc::new(store), options).unwrap();

        assert!(fs.getattr("/2/1/2.png").is_ok());
        assert_eq!(fs.getattr("/2/1/2.jpg"), Err(FsError::NotFound));
    }

    #[test]
    fn test_mtime_comes_from_store() {
        let when = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_600_000_000);
        let store = MemoryTileStore::new().with_modified(when);
        let fs = TileFs::init_quiet(Arc::new(store), TileFsOptions::default()).unwrap();
        assert_eq!(fs.getattr("/").unwrap().mtime, when);
    }

    #[test]
    fn test_init_fails_on_closed_store() {
        let store = MemoryTileStore::new();
        store.close().unwrap();
        let result = TileFs::init_quiet(Arc::new(store), TileFsOptions::default());
        assert!(matches!(result, Err(InitError::Store(_))));
    }

    #[test]
    fn test_init_logs_metadata() {
        let logger = Arc::new(MemoryLogger::new());
        let store = MemoryTileStore::new().with_metadata("name", "Natural Earth");
        TileFs::init(Arc::new(store), TileFsOptions::default(), logger.clone()).unwrap();
        assert!(logger.contains(LogLevel::Info, "Natural Earth"));
    }

    #[test]
    fn test_after_shutdown_listing_is_invalid_and_attr_not_found() {
        let logger = Arc::new(MemoryLogger::new());
        let store = MemoryTileStore::new().with_tile(2, 1, 1, TILE.to_vec());
        let fs = TileFs::init(Arc::new(store), TileFsOptions::default(), logger.clone()).unwrap();

        fs.shutdown();
        assert!(fs.is_shut_down());
        assert_eq!(fs.readdir("/"), Err(FsError::InvalidArgument));
        assert_eq!(fs.readdir("/2/1"), Err(FsError::InvalidArgument));
        assert_eq!(fs.getattr("/2/1/2.png"), Err(FsError::NotFound));
        // directories need no query
        assert!(fs.getattr("/2").is_ok());
        assert!(logger.contains(LogLevel::Warn, "readdir / failed"));
    }

    #[test]
    fn test_shutdown_twice_is_harmless() {
        let logger = Arc::new(MemoryLogger::new());
        let fs = TileFs::init(
            Arc::new(MemoryTileStore::new()),
            TileFsOptions::default(),
            logger.clone(),
        )
        .unwrap();
        fs.shutdown();
        fs.shutdown();
        assert!(logger.contains(LogLevel::Info, "Tile store closed"));
        assert!(logger.contains(LogLevel::Debug, "already closed"));
    }

    #[test]
    fn test_copy_range_bounds() {
        let mut buf = [0u8; 4];
        assert_eq!(copy_range(b"", 0, &mut buf), 0);
        assert_eq!(copy_range(b"ab", 1, &mut buf), 1);
        assert_eq!(buf[0], b'b');
        assert_eq!(copy_range(b"abcdef", 0, &mut []), 0);
    }
}
