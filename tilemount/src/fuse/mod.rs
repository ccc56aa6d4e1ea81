//! Read-only FUSE filesystem over a tile store.
//!
//! [`TileFs`] answers each filesystem operation for a path; the
//! [`fuse3`] module binds it to the kernel.

pub mod attr;
pub mod error;
pub mod fuse3;
pub mod handlers;

pub use attr::{DirEntry, NodeAttr, NodeKind};
pub use error::{FsError, InitError};
pub use handlers::{TileFs, TileFsOptions, DEFAULT_EXTENSION};
