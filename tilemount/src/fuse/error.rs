//! Errors returned by filesystem handlers.

use thiserror::Error;

use crate::store::StoreError;

/// Per-operation filesystem error.
///
/// Every failure inside a handler is mapped to one of these before it
/// leaves the handler; none of them unmounts the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FsError {
    /// Path is malformed or names nothing in the store
    #[error("no such file or directory")]
    NotFound,

    /// Operation does not apply to this kind of node
    #[error("invalid argument")]
    InvalidArgument,

    /// Reads of non-files and every write-class operation
    #[error("operation not permitted")]
    PermissionDenied,
}

impl FsError {
    /// POSIX error number.
    pub fn errno(self) -> i32 {
        match self {
            FsError::NotFound => libc::ENOENT,
            FsError::InvalidArgument => libc::EINVAL,
            FsError::PermissionDenied => libc::EPERM,
        }
    }

    /// Status for callback-style dispatchers: the negated errno.
    pub fn status_code(self) -> i32 {
        -self.errno()
    }
}

/// Fatal startup failure.
#[derive(Debug, Error)]
pub enum InitError {
    /// The tile store could not be opened or read
    #[error("Failed to initialize tile store: {0}")]
    Store(#[from] StoreError),
}
