//! Conversions between handler results and fuse3 reply types.

use std::ffi::{OsStr, OsString};
use std::time::Duration;

use fuse3::path::reply::{DirectoryEntry, FileAttr, ReplyStatFs};
use fuse3::{Errno, FileType};

use crate::fuse::attr::{DirEntry, NodeAttr, NodeKind, BLOCK_SIZE};
use crate::fuse::error::FsError;

/// Default time-to-live for attribute and entry caching.
pub const TTL: Duration = Duration::from_secs(1);

impl From<FsError> for Errno {
    fn from(err: FsError) -> Self {
        Errno::from(err.errno())
    }
}

/// Maps a node kind to the fuse3 file type.
pub fn file_type(kind: NodeKind) -> FileType {
    match kind {
        NodeKind::Directory => FileType::Directory,
        NodeKind::RegularFile => FileType::RegularFile,
    }
}

/// Builds fuse3 attributes for a node, owned by the mounting user.
pub fn to_file_attr(attr: &NodeAttr) -> FileAttr {
    let time = attr.mtime.into();
    FileAttr {
        size: attr.size,
        blocks: attr.blocks(),
        atime: time,
        mtime: time,
        ctime: time,
        kind: file_type(attr.kind),
        perm: attr.perm,
        nlink: attr.nlink,
        uid: unsafe { libc::getuid() },
        gid: unsafe { libc::getgid() },
        rdev: 0,
        blksize: BLOCK_SIZE,
    }
}

/// Joins a parent path from `lookup` with a child name.
///
/// Returns `None` for names that are not UTF-8; no tile path contains one.
pub fn child_path(parent: &OsStr, name: &OsStr) -> Option<String> {
    let parent = parent.to_str()?;
    let name = name.to_str()?;
    if parent.ends_with('/') {
        Some(format!("{}{}", parent, name))
    } else {
        Some(format!("{}/{}", parent, name))
    }
}

/// Converts a kernel path to a string, treating non-UTF-8 as missing.
pub fn path_str(path: &OsStr) -> Result<String, Errno> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| Errno::from(FsError::NotFound))
}

/// Builds a directory listing with `.` and `..`, skipping the first
/// `offset` entries already returned to the kernel.
pub fn directory_entries(children: Vec<DirEntry>, offset: i64) -> Vec<fuse3::Result<DirectoryEntry>> {
    let dots = [
        DirEntry::directory("."),
        DirEntry::directory(".."),
    ];
    dots.into_iter()
        .chain(children)
        .enumerate()
        .map(|(i, entry)| {
            Ok(DirectoryEntry {
                kind: file_type(entry.kind),
                name: OsString::from(entry.name),
                offset: i as i64 + 1,
            })
        })
        .skip(offset.max(0) as usize)
        .collect()
}

/// Filesystem statistics for a read-only mount with no free space.
pub fn statfs_reply() -> ReplyStatFs {
    ReplyStatFs {
        blocks: 0,
        bfree: 0,
        bavail: 0,
        files: 0,
        ffree: 0,
        bsize: BLOCK_SIZE,
        namelen: 255,
        frsize: BLOCK_SIZE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    #[test]
    fn test_errno_from_fs_error() {
        let errno: Errno = FsError::NotFound.into();
        assert_eq!(errno, Errno::from(libc::ENOENT));
        let errno: Errno = FsError::PermissionDenied.into();
        assert_eq!(errno, Errno::from(libc::EPERM));
    }

    #[test]
    fn test_to_file_attr_directory() {
        let attr = to_file_attr(&NodeAttr::directory(SystemTime::UNIX_EPOCH));
        assert_eq!(attr.kind, FileType::Directory);
        assert_eq!(attr.size, 4096);
        assert_eq!(attr.perm, 0o555);
        assert_eq!(attr.nlink, 2);
    }

    #[test]
    fn test_to_file_attr_file() {
        let attr = to_file_attr(&NodeAttr::file(1025, SystemTime::UNIX_EPOCH));
        assert_eq!(attr.kind, FileType::RegularFile);
        assert_eq!(attr.size, 1025);
        assert_eq!(attr.blocks, 3);
        assert_eq!(attr.perm, 0o444);
    }

    #[test]
    fn test_child_path() {
        assert_eq!(
            child_path(OsStr::new("/"), OsStr::new("2")).as_deref(),
            Some("/2")
        );
        assert_eq!(
            child_path(OsStr::new("/2/1"), OsStr::new("3.png")).as_deref(),
            Some("/2/1/3.png")
        );
    }

    #[test]
    fn test_directory_entries_include_dots() {
        let entries = directory_entries(vec![DirEntry::directory("0"), DirEntry::directory("5")], 0);
        let names: Vec<_> = entries
            .iter()
            .map(|e| e.as_ref().unwrap().name.clone())
            .collect();
        assert_eq!(names, [".", "..", "0", "5"]);
        let offsets: Vec<_> = entries.iter().map(|e| e.as_ref().unwrap().offset).collect();
        assert_eq!(offsets, [1, 2, 3, 4]);
    }

    #[test]
    fn test_directory_entries_resume_from_offset() {
        let entries = directory_entries(vec![DirEntry::file("0.png"), DirEntry::file("1.png")], 3);
        assert_eq!(entries.len(), 1);
        let entry = entries[0].as_ref().unwrap();
        assert_eq!(entry.name, "1.png");
        assert_eq!(entry.kind, FileType::RegularFile);
        assert_eq!(entry.offset, 4);
    }

    #[test]
    fn test_directory_entries_negative_offset() {
        assert_eq!(directory_entries(Vec::new(), -1).len(), 2);
    }
}
