//! Async multi-threaded FUSE binding using fuse3.
//!
//! ```text
//! kernel                     Tokio runtime
//!    │                              │
//!    ├── getattr(/2/1/2.png) ──────►├── spawn_blocking ──► TileFs::getattr
//!    ├── read(/2/1/2.png) ─────────►├── spawn_blocking ──► TileFs::read
//!    │◄── replies ──────────────────┤
//! ```
//!
//! The path-based fuse3 API is used, so no inode table is kept: every
//! request arrives as a full path and is resolved from scratch.

mod filesystem;
mod shared;
mod types;

pub use filesystem::Fuse3TileFs;
pub use shared::{directory_entries, to_file_attr, TTL};
pub use types::{Fuse3Error, Fuse3Result, MountHandle};
