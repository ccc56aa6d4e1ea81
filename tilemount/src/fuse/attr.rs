//! Node attributes and directory entries produced by the handlers.

use std::time::SystemTime;

/// Size reported for every directory.
pub const DIR_SIZE: u64 = 4096;

/// r-xr-xr-x
pub const DIR_PERM: u16 = 0o555;

/// r--r--r--
pub const FILE_PERM: u16 = 0o444;

/// Block size reported in attributes.
pub const BLOCK_SIZE: u32 = 4096;

/// Kind of a node in the mounted tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    RegularFile,
}

/// Attributes of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeAttr {
    pub kind: NodeKind,
    pub size: u64,
    pub perm: u16,
    pub nlink: u32,
    /// Used for atime, mtime and ctime alike
    pub mtime: SystemTime,
}

impl NodeAttr {
    /// Attributes of a synthesized directory.
    pub fn directory(mtime: SystemTime) -> Self {
        Self {
            kind: NodeKind::Directory,
            size: DIR_SIZE,
            perm: DIR_PERM,
            nlink: 2,
            mtime,
        }
    }

    /// Attributes of a tile of `size` bytes.
    pub fn file(size: u64, mtime: SystemTime) -> Self {
        Self {
            kind: NodeKind::RegularFile,
            size,
            perm: FILE_PERM,
            nlink: 1,
            mtime,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Number of 512-byte blocks, as `stat` reports them.
    pub fn blocks(&self) -> u64 {
        self.size.div_ceil(512)
    }
}

/// One child in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: NodeKind,
}

impl DirEntry {
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Directory,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::RegularFile,
        }
    }
}
