//! Service error types.

use crate::fuse::fuse3::Fuse3Error;
use crate::fuse::InitError;
use std::fmt;
use std::io;

/// Errors that can occur while bringing up or running a mount.
#[derive(Debug)]
pub enum ServiceError {
    /// Tile store path is missing or not a file
    InvalidStore(String),
    /// Mountpoint is missing or not a directory
    InvalidMountpoint(String),
    /// Tile store could not be opened or read
    StoreError(InitError),
    /// I/O error (mountpoint creation, etc.)
    IoError(io::Error),
    /// FUSE mount or operation error
    FuseError(Fuse3Error),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStore(msg) => write!(f, "Invalid tile store: {}", msg),
            Self::InvalidMountpoint(msg) => write!(f, "Invalid mountpoint: {}", msg),
            Self::StoreError(e) => write!(f, "Tile store error: {}", e),
            Self::IoError(e) => write!(f, "I/O error: {}", e),
            Self::FuseError(e) => write!(f, "FUSE error: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StoreError(e) => Some(e),
            Self::IoError(e) => Some(e),
            Self::FuseError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InitError> for ServiceError {
    fn from(e: InitError) -> Self {
        Self::StoreError(e)
    }
}

impl From<Fuse3Error> for ServiceError {
    fn from(e: Fuse3Error) -> Self {
        Self::FuseError(e)
    }
}

impl From<io::Error> for ServiceError {
    fn from(e: io::Error) -> Self {
        Self::IoError(e)
    }
}
