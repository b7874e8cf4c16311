//! ``src/fs/dir_reader.rs``
//!
//! # `DirReader`: One-Level Directory Listing
//!
//! The tree builder never touches the OS directly; it asks a `DirReader`
//! for the immediate entries of one directory. `FsDirReader` is the real
//! implementation, built on `walkdir` with symlinks left unfollowed.

use std::{
    io,
    path::{Path, PathBuf},
};

use compact_str::CompactString;
use walkdir::WalkDir;

use crate::{error::AppError, fs::dir_node::NodeKind};

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: CompactString,
    pub path: PathBuf,
    pub kind: NodeKind,
    /// `lstat` length; directories report their own inode size, which the
    /// tree builder ignores.
    pub size: u64,
}

/// Lists the immediate children of a directory.
pub trait DirReader: Send + Sync {
    /// Describe the walk root itself. Unlike listed entries, a symlinked
    /// root is resolved so `snapshots/latest` can be compared directly.
    fn stat(&self, path: &Path) -> Result<DirEntryInfo, AppError>;

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>, AppError>;
}

/// Filesystem-backed reader.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDirReader;

impl FsDirReader {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DirReader for FsDirReader {
    fn stat(&self, path: &Path) -> Result<DirEntryInfo, AppError> {
        let metadata = std::fs::metadata(path).map_err(|e| AppError::metadata(path, e))?;
        let kind = if metadata.is_dir() {
            NodeKind::Dir
        } else if metadata.is_file() {
            NodeKind::File
        } else {
            NodeKind::Other
        };

        Ok(DirEntryInfo {
            name: CompactString::from(path.to_string_lossy()),
            path: path.to_path_buf(),
            kind,
            size: metadata.len(),
        })
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>, AppError> {
        let mut entries: Vec<DirEntryInfo> = Vec::new();

        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            let entry = entry.map_err(|e| walk_error(path, e))?;
            let file_type = entry.file_type();

            let kind = if file_type.is_symlink() {
                NodeKind::Symlink
            } else if file_type.is_dir() {
                NodeKind::Dir
            } else if file_type.is_file() {
                NodeKind::File
            } else {
                NodeKind::Other
            };

            let metadata = entry
                .metadata()
                .map_err(|e| AppError::metadata(entry.path(), into_io(e)))?;

            entries.push(DirEntryInfo {
                name: CompactString::from(entry.file_name().to_string_lossy()),
                path: entry.path().to_path_buf(),
                kind,
                size: metadata.len(),
            });
        }

        Ok(entries)
    }
}

fn walk_error(dir: &Path, err: walkdir::Error) -> AppError {
    let path = err.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
    AppError::read_dir(path, into_io(err))
}

fn into_io(err: walkdir::Error) -> io::Error {
    let msg = err.to_string();
    err.into_io_error()
        .unwrap_or_else(|| io::Error::other(msg))
}
