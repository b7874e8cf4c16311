//! `src/fs/dir_node.rs`
//! ============================================================
//! Immutable, size-annotated filesystem tree.
//!
//! Goals
//! -----
//! • Built once per snapshot, never mutated afterwards.
//! • Children shared through `Arc` so navigation frames point at
//!   existing nodes instead of copying subtrees.
//! • A zero-size "missing" placeholder gives unmatched comparison
//!   rows the same shape as matched ones.

use std::{
    cmp::Ordering,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use compact_str::CompactString;

/// Label shown for the absent side of an unmatched row.
pub const MISSING_LABEL: &str = "—";

// ------------------------------------------------------------
// NodeKind — what kind of entry a node was built from.
// ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Dir,
    File,
    /// Never followed; sized by `lstat`.
    Symlink,
    /// Sockets, fifos, devices.
    Other,
    /// Placeholder for an entry absent on one side of a comparison.
    Missing,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dir => write!(f, "Dir"),
            Self::File => write!(f, "File"),
            Self::Symlink => write!(f, "Symlink"),
            Self::Other => write!(f, "Other"),
            Self::Missing => write!(f, "Missing"),
        }
    }
}

// ------------------------------------------------------------
// DirNode
// ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirNode {
    /// Absolute location. Empty for the missing placeholder.
    pub path: PathBuf,

    /// Entry name relative to the parent; the root path for a root node.
    pub name: CompactString,

    /// Byte length, or the sum of all descendant sizes for directories.
    pub size: u64,

    pub kind: NodeKind,

    /// Size descending, name ascending. Empty for non-directories.
    pub children: Vec<Arc<DirNode>>,
}

impl DirNode {
    /// Leaf for a file, symlink or special entry.
    #[must_use]
    pub fn leaf(path: PathBuf, name: impl Into<CompactString>, size: u64, kind: NodeKind) -> Self {
        Self {
            path,
            name: name.into(),
            size,
            kind,
            children: Vec::new(),
        }
    }

    /// Directory node. Sorts `children` and derives the size from them.
    #[must_use]
    pub fn dir(path: PathBuf, name: impl Into<CompactString>, mut children: Vec<Arc<DirNode>>) -> Self {
        sort_children(&mut children);
        let size = children
            .iter()
            .fold(0u64, |acc, child| acc.saturating_add(child.size));

        Self {
            path,
            name: name.into(),
            size,
            kind: NodeKind::Dir,
            children,
        }
    }

    /// Zero-size stand-in for the absent side of a comparison row.
    #[must_use]
    pub fn missing(name: impl Into<CompactString>) -> Self {
        Self {
            path: PathBuf::new(),
            name: name.into(),
            size: 0,
            kind: NodeKind::Missing,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self.kind, NodeKind::Missing)
    }

    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Dir)
    }

    /// True when drilling into this node would show something.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Absolute path, or `None` for the missing placeholder.
    #[must_use]
    pub fn real_path(&self) -> Option<&Path> {
        (!self.is_missing()).then_some(self.path.as_path())
    }

    /// Display name, `—` for the missing placeholder.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.is_missing() {
            MISSING_LABEL
        } else {
            self.name.as_str()
        }
    }
}

/// Size descending; equal sizes by name ascending.
pub fn sort_children(children: &mut [Arc<DirNode>]) {
    children.sort_by(|a: &Arc<DirNode>, b: &Arc<DirNode>| -> Ordering {
        b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name))
    });
}
