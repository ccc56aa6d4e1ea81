//! Mount handle and mount errors.

use fuse3::raw::MountHandle as SessionHandle;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;

pub type Fuse3Result<T> = Result<T, Fuse3Error>;

/// Failure to bring a mount up or take it down.
#[derive(Debug, Error)]
pub enum Fuse3Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The FUSE session could not be started (no `/dev/fuse`, no
    /// `fusermount3`, mountpoint busy)
    #[error("Mount failed at {}: {reason}", mountpoint.display())]
    MountFailed { mountpoint: PathBuf, reason: String },

    #[error("Mountpoint is not a directory: {}", .0.display())]
    InvalidMountpoint(PathBuf),
}

/// A live mount.
///
/// Awaiting the handle resolves once the filesystem is unmounted from
/// outside (`fusermount -u`, `umount`). Dropping it unmounts.
pub struct MountHandle {
    session: SessionHandle,
    mountpoint: PathBuf,
}

impl MountHandle {
    pub(crate) fn new(session: SessionHandle, mountpoint: PathBuf) -> Self {
        Self {
            session,
            mountpoint,
        }
    }

    pub fn mountpoint(&self) -> &Path {
        &self.mountpoint
    }

    /// Unmounts and waits for the session to end.
    pub async fn unmount(self) -> io::Result<()> {
        self.session.unmount().await
    }
}

impl Future for MountHandle {
    type Output = io::Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.session).poll(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let err: Fuse3Error = io::Error::new(io::ErrorKind::NotFound, "no /dev/fuse").into();
        assert!(matches!(err, Fuse3Error::Io(_)));
        assert_eq!(err.to_string(), "I/O error: no /dev/fuse");
    }

    #[test]
    fn test_mount_failed_names_mountpoint() {
        let err = Fuse3Error::MountFailed {
            mountpoint: PathBuf::from("/mnt/tiles"),
            reason: "fusermount3 not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Mount failed at /mnt/tiles: fusermount3 not found"
        );
    }

    #[test]
    fn test_invalid_mountpoint() {
        let err = Fuse3Error::InvalidMountpoint(PathBuf::from("/mnt/tiles/x.png"));
        assert!(err.to_string().contains("/mnt/tiles/x.png"));
    }
}
