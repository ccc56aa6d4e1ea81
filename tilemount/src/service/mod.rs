//! Mount service for tilemount.
//!
//! Wires a tile store, the filesystem handlers and the fuse3 binding
//! together behind [`MountService`].

mod error;
mod fuse_mount;

pub use error::ServiceError;
pub use fuse_mount::{MountConfig, MountService};
