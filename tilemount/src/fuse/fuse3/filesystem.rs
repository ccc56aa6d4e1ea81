//! fuse3 path-based filesystem over [`TileFs`].

use super::shared::{
    child_path, directory_entries, path_str, statfs_reply, to_file_attr, TTL,
};
use super::types::{Fuse3Error, Fuse3Result, MountHandle};
use crate::fuse::attr::{NodeAttr, NodeKind};
use crate::fuse::error::FsError;
use crate::fuse::handlers::TileFs;
use bytes::Bytes;
use fuse3::path::prelude::*;
use fuse3::path::reply::DirectoryEntryPlus;
use fuse3::{Errno, MountOptions, SetAttr};
use std::ffi::{OsStr, OsString};
use std::num::NonZeroU32;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, trace};

/// Largest read the kernel is told to expect.
const MAX_READ: u32 = 1024 * 1024;

/// Tile filesystem exposed through fuse3.
///
/// Every request is translated to a path and handed to [`TileFs`] on
/// tokio's blocking pool, since store queries block on SQLite.
pub struct Fuse3TileFs {
    core: Arc<TileFs>,
    ttl: Duration,
}

impl Fuse3TileFs {
    pub fn new(core: Arc<TileFs>) -> Self {
        Self { core, ttl: TTL }
    }

    /// Sets how long the kernel may cache attributes and entries.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn core(&self) -> &Arc<TileFs> {
        &self.core
    }

    /// Mounts the filesystem read-only at `mountpoint`.
    ///
    /// The returned handle resolves when the filesystem is unmounted.
    pub async fn mount(self, mountpoint: &Path) -> Fuse3Result<MountHandle> {
        if !mountpoint.is_dir() {
            return Err(Fuse3Error::InvalidMountpoint(mountpoint.to_path_buf()));
        }

        let mut mount_options = MountOptions::default();
        mount_options.fs_name("tilemount");
        mount_options.read_only(true);
        mount_options.force_readdir_plus(false);
        // Directories are stateless; readdir is called with fh 0
        mount_options.no_open_dir_support(true);

        let mount_failed = |e: std::io::Error| Fuse3Error::MountFailed {
            mountpoint: mountpoint.to_path_buf(),
            reason: e.to_string(),
        };

        #[cfg(target_os = "linux")]
        let session = fuse3::path::Session::new(mount_options)
            .mount_with_unprivileged(self, mountpoint)
            .await
            .map_err(mount_failed)?;

        #[cfg(not(target_os = "linux"))]
        let session = fuse3::path::Session::new(mount_options)
            .mount(self, mountpoint)
            .await
            .map_err(mount_failed)?;

        Ok(MountHandle::new(session, mountpoint.to_path_buf()))
    }

    /// Runs a handler on the blocking pool and maps its error.
    async fn blocking<T, F>(&self, f: F) -> Result<T, Errno>
    where
        F: FnOnce(&TileFs) -> Result<T, FsError> + Send + 'static,
        T: Send + 'static,
    {
        let core = Arc::clone(&self.core);
        match tokio::task::spawn_blocking(move || f(&core)).await {
            Ok(result) => result.map_err(|e| {
                trace!(status = e.status_code(), error = %e, "fuse3: reply");
                Errno::from(e)
            }),
            Err(e) => {
                error!(error = %e, "fuse3: handler task failed");
                Err(Errno::from(libc::EIO))
            }
        }
    }

    fn attr_reply(&self, attr: &NodeAttr) -> ReplyAttr {
        ReplyAttr {
            ttl: self.ttl,
            attr: to_file_attr(attr),
        }
    }

    fn refuse(&self, op: &str, path: &OsStr) -> Errno {
        self.core
            .reject_write(op, &path.to_string_lossy())
            .into()
    }
}

impl PathFilesystem for Fuse3TileFs {
    type DirEntryStream<'a>
        = futures::stream::Iter<std::vec::IntoIter<fuse3::Result<DirectoryEntry>>>
    where
        Self: 'a;
    type DirEntryPlusStream<'a>
        = futures::stream::Iter<std::vec::IntoIter<fuse3::Result<DirectoryEntryPlus>>>
    where
        Self: 'a;

    async fn init(&self, _req: Request) -> fuse3::Result<ReplyInit> {
        info!(extension = %self.core.extension(), "fuse3: tile filesystem ready");
        Ok(ReplyInit {
            max_write: NonZeroU32::new(MAX_READ).ok_or_else(|| Errno::from(libc::EINVAL))?,
        })
    }

    async fn destroy(&self, _req: Request) {
        debug!("fuse3: destroy");
        let core = Arc::clone(&self.core);
        if let Err(e) = tokio::task::spawn_blocking(move || core.shutdown()).await {
            error!(error = %e, "fuse3: shutdown task failed");
        }
    }

    async fn lookup(&self, _req: Request, parent: &OsStr, name: &OsStr) -> fuse3::Result<ReplyEntry> {
        trace!(parent = ?parent, name = ?name, "fuse3: lookup");
        let path = child_path(parent, name).ok_or_else(|| Errno::from(FsError::NotFound))?;
        let attr = self.blocking(move |fs| fs.getattr(&path)).await?;
        Ok(ReplyEntry {
            ttl: self.ttl,
            attr: to_file_attr(&attr),
        })
    }

    async fn getattr(
        &self,
        _req: Request,
        path: Option<&OsStr>,
        _fh: Option<u64>,
        _flags: u32,
    ) -> fuse3::Result<ReplyAttr> {
        trace!(path = ?path, "fuse3: getattr");
        let path = path_str(path.ok_or_else(Errno::new_not_exist)?)?;
        let attr = self.blocking(move |fs| fs.getattr(&path)).await?;
        Ok(self.attr_reply(&attr))
    }

    async fn open(&self, _req: Request, path: &OsStr, flags: u32) -> fuse3::Result<ReplyOpen> {
        trace!(path = ?path, flags = flags, "fuse3: open");
        let path = path_str(path)?;
        self.blocking(move |fs| fs.open(&path, flags)).await?;
        Ok(ReplyOpen { fh: 0, flags: 0 })
    }

    async fn read(
        &self,
        _req: Request,
        path: Option<&OsStr>,
        _fh: u64,
        offset: u64,
        size: u32,
    ) -> fuse3::Result<ReplyData> {
        trace!(path = ?path, offset = offset, size = size, "fuse3: read");
        let path = path_str(path.ok_or_else(Errno::new_not_exist)?)?;
        let data = self
            .blocking(move |fs| {
                let mut buf = vec![0u8; size as usize];
                let n = fs.read(&path, offset, &mut buf)?;
                buf.truncate(n);
                Ok(buf)
            })
            .await?;
        Ok(ReplyData {
            data: Bytes::from(data),
        })
    }

    async fn release(
        &self,
        _req: Request,
        path: Option<&OsStr>,
        _fh: u64,
        _flags: u32,
        _lock_owner: u64,
        _flush: bool,
    ) -> fuse3::Result<()> {
        let path = path.map(OsStr::to_string_lossy).unwrap_or_default();
        self.core.release(&path).map_err(Errno::from)
    }

    async fn flush(
        &self,
        _req: Request,
        _path: Option<&OsStr>,
        _fh: u64,
        _lock_owner: u64,
    ) -> fuse3::Result<()> {
        Ok(())
    }

    async fn opendir(&self, _req: Request, path: &OsStr, _flags: u32) -> fuse3::Result<ReplyOpen> {
        trace!(path = ?path, "fuse3: opendir");
        let path = path_str(path)?;
        let attr = self.blocking(move |fs| fs.getattr(&path)).await?;
        if !attr.is_dir() {
            return Err(Errno::from(libc::ENOTDIR));
        }
        Ok(ReplyOpen { fh: 0, flags: 0 })
    }

    async fn readdir<'a>(
        &'a self,
        _req: Request,
        path: &'a OsStr,
        _fh: u64,
        offset: i64,
    ) -> fuse3::Result<ReplyDirectory<Self::DirEntryStream<'a>>> {
        trace!(path = ?path, offset = offset, "fuse3: readdir");
        let path = path_str(path)?;
        let children = self.blocking(move |fs| fs.readdir(&path)).await?;
        Ok(ReplyDirectory {
            entries: futures::stream::iter(directory_entries(children, offset)),
        })
    }

    async fn readdirplus<'a>(
        &'a self,
        _req: Request,
        parent: &'a OsStr,
        _fh: u64,
        offset: u64,
        _lock_owner: u64,
    ) -> fuse3::Result<ReplyDirectoryPlus<Self::DirEntryPlusStream<'a>>> {
        trace!(path = ?parent, offset = offset, "fuse3: readdirplus");
        let parent = path_str(parent)?;
        let listing = self
            .blocking(move |fs| {
                let dir_attr = fs.getattr(&parent)?;
                let mut listing = vec![
                    (OsString::from("."), dir_attr),
                    (OsString::from(".."), NodeAttr::directory(dir_attr.mtime)),
                ];
                for child in fs.readdir(&parent)? {
                    let attr = match child.kind {
                        NodeKind::Directory => NodeAttr::directory(dir_attr.mtime),
                        NodeKind::RegularFile => {
                            let path = child_path(OsStr::new(&parent), OsStr::new(&child.name))
                                .ok_or(FsError::NotFound)?;
                            match fs.getattr(&path) {
                                Ok(attr) => attr,
                                // vanished between listing and stat
                                Err(FsError::NotFound) => continue,
                                Err(e) => return Err(e),
                            }
                        }
                    };
                    listing.push((OsString::from(child.name), attr));
                }
                Ok(listing)
            })
            .await?;

        let entries: Vec<_> = listing
            .into_iter()
            .enumerate()
            .map(|(i, (name, attr))| {
                Ok(DirectoryEntryPlus {
                    kind: to_file_attr(&attr).kind,
                    name,
                    offset: i as i64 + 1,
                    attr: to_file_attr(&attr),
                    entry_ttl: self.ttl,
                    attr_ttl: self.ttl,
                })
            })
            .skip(offset as usize)
            .collect();

        Ok(ReplyDirectoryPlus {
            entries: futures::stream::iter(entries),
        })
    }

    async fn releasedir(
        &self,
        _req: Request,
        path: &OsStr,
        _fh: u64,
        _flags: u32,
    ) -> fuse3::Result<()> {
        self.core
            .release(&path.to_string_lossy())
            .map_err(Errno::from)
    }

    async fn access(&self, _req: Request, path: &OsStr, mask: u32) -> fuse3::Result<()> {
        trace!(path = ?path, mask = mask, "fuse3: access");
        if mask as i32 & libc::W_OK != 0 {
            return Err(Errno::from(libc::EACCES));
        }
        let path = path_str(path)?;
        self.blocking(move |fs| fs.getattr(&path)).await?;
        Ok(())
    }

    async fn statfs(&self, _req: Request, _path: &OsStr) -> fuse3::Result<ReplyStatFs> {
        Ok(statfs_reply())
    }

    async fn setattr(
        &self,
        _req: Request,
        path: Option<&OsStr>,
        _fh: Option<u64>,
        _set_attr: SetAttr,
    ) -> fuse3::Result<ReplyAttr> {
        Err(self.refuse("setattr", path.unwrap_or_default()))
    }

    async fn mkdir(
        &self,
        _req: Request,
        parent: &OsStr,
        name: &OsStr,
        _mode: u32,
        _umask: u32,
    ) -> fuse3::Result<ReplyEntry> {
        let path = child_path(parent, name).unwrap_or_default();
        Err(self.refuse("mkdir", OsStr::new(&path)))
    }

    async fn unlink(&self, _req: Request, parent: &OsStr, name: &OsStr) -> fuse3::Result<()> {
        let path = child_path(parent, name).unwrap_or_default();
        Err(self.refuse("unlink", OsStr::new(&path)))
    }

    async fn rmdir(&self, _req: Request, parent: &OsStr, name: &OsStr) -> fuse3::Result<()> {
        let path = child_path(parent, name).unwrap_or_default();
        Err(self.refuse("rmdir", OsStr::new(&path)))
    }

    async fn rename(
        &self,
        _req: Request,
        origin_parent: &OsStr,
        origin_name: &OsStr,
        _parent: &OsStr,
        _name: &OsStr,
    ) -> fuse3::Result<()> {
        let path = child_path(origin_parent, origin_name).unwrap_or_default();
        Err(self.refuse("rename", OsStr::new(&path)))
    }

    async fn create(
        &self,
        _req: Request,
        parent: &OsStr,
        name: &OsStr,
        _mode: u32,
        _flags: u32,
    ) -> fuse3::Result<ReplyCreated> {
        let path = child_path(parent, name).unwrap_or_default();
        Err(self.refuse("create", OsStr::new(&path)))
    }

    async fn write(
        &self,
        _req: Request,
        path: Option<&OsStr>,
        _fh: u64,
        _offset: u64,
        _data: &[u8],
        _write_flags: u32,
        _flags: u32,
    ) -> fuse3::Result<ReplyWrite> {
        Err(self.refuse("write", path.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuse::handlers::TileFsOptions;
    use crate::store::MemoryTileStore;

    fn fuse_fs() -> Fuse3TileFs {
        let store = MemoryTileStore::new().with_tile(2, 1, 1, b"tile".to_vec());
        let core = TileFs::init_quiet(Arc::new(store), TileFsOptions::default()).unwrap();
        Fuse3TileFs::new(Arc::new(core))
    }

    #[test]
    fn test_fuse3_tile_fs_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<Fuse3TileFs>();
    }

    #[test]
    fn test_default_ttl() {
        assert_eq!(fuse_fs().ttl, TTL);
        assert_eq!(
            fuse_fs().with_ttl(Duration::from_secs(30)).ttl,
            Duration::from_secs(30)
        );
    }

    #[tokio::test]
    async fn test_blocking_maps_errors() {
        let fs = fuse_fs();
        let found = fs.blocking(|core| core.getattr("/2/1/2.png")).await;
        assert_eq!(found.map(|a| a.size), Ok(4));

        let missing = fs.blocking(|core| core.getattr("/2/1/1.png")).await;
        assert_eq!(missing.map(|a| a.size), Err(Errno::from(libc::ENOENT)));

        let listing = fs.blocking(|core| core.readdir("/2/1/2.png")).await;
        assert_eq!(listing.map(|l| l.len()), Err(Errno::from(libc::EINVAL)));
    }

    #[test]
    fn test_refuse_is_eperm() {
        assert_eq!(
            fuse_fs().refuse("mkdir", OsStr::new("/3")),
            Errno::from(libc::EPERM)
        );
    }

    #[tokio::test]
    async fn test_mount_rejects_missing_mountpoint() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let result = fuse_fs().mount(&missing).await;
        assert!(matches!(result, Err(Fuse3Error::InvalidMountpoint(p)) if p == missing));
    }
}
