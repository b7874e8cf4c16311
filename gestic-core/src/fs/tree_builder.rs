//! ``src/fs/tree_builder.rs``
//! ============================================================================
//! # Tree Builder: Recursive, Cancellable Size Aggregation
//!
//! Walks a snapshot root into an immutable [`DirNode`] tree. Files become
//! leaves carrying their byte length, directories carry the sum of their
//! children, symlinks are opaque leaves sized by `lstat`. Any listing or
//! metadata failure aborts the whole build; no partial tree is returned.
//!
//! The walk itself is synchronous and runs on Tokio's blocking pool. The
//! async entry points add a timeout and wire a [`CancellationToken`] that
//! the walker checks before every directory it lists.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::task::{self as TokioScheduler, JoinError};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, instrument, warn};

use crate::{
    error::AppError,
    fs::{
        dir_node::{DirNode, NodeKind},
        dir_reader::{DirReader, FsDirReader},
    },
};

/// Synchronous walker over a [`DirReader`].
pub struct TreeBuilder<R: DirReader> {
    reader: R,
    cancel: CancellationToken,
}

impl<R: DirReader> TreeBuilder<R> {
    pub const fn new(reader: R, cancel: CancellationToken) -> Self {
        Self { reader, cancel }
    }

    /// Build the tree rooted at `root`. The root node's name is the root
    /// path itself.
    #[instrument(level = "debug", skip(self), fields(root = %root.display()))]
    pub fn build(&self, root: &Path) -> Result<Arc<DirNode>, AppError> {
        let start = Instant::now();
        let (node, nodes) = self.walk(root)?;

        info!(
            marker = "TREE_BUILD",
            operation_type = "tree_build_complete",
            root = %root.display(),
            nodes,
            total_size = node.size,
            duration_ms = start.elapsed().as_millis(),
            "Snapshot tree built"
        );

        Ok(Arc::new(node))
    }

    /// The tree rooted at `root` and the number of nodes in it.
    fn walk(&self, root: &Path) -> Result<(DirNode, usize), AppError> {
        let root_name = root.to_string_lossy();
        let mut nodes = 0;

        let stat = self.reader.stat(root)?;
        let node = if stat.kind == NodeKind::Dir {
            self.build_dir(root, &root_name, &mut nodes)?
        } else {
            nodes += 1;
            DirNode::leaf(root.to_path_buf(), root_name.as_ref(), stat.size, stat.kind)
        };

        Ok((node, nodes))
    }

    fn build_dir(&self, path: &Path, name: &str, nodes: &mut usize) -> Result<DirNode, AppError> {
        if self.cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let entries = self.reader.read_dir(path)?;
        let mut children: Vec<Arc<DirNode>> = Vec::with_capacity(entries.len());

        for entry in entries {
            let child = match entry.kind {
                NodeKind::Dir => self.build_dir(&entry.path, &entry.name, nodes)?,
                kind => {
                    *nodes += 1;
                    DirNode::leaf(entry.path, entry.name, entry.size, kind)
                }
            };
            children.push(Arc::new(child));
        }

        *nodes += 1;
        Ok(DirNode::dir(path.to_path_buf(), name, children))
    }
}

/// Build one tree from the real filesystem, bounded by `timeout`.
pub async fn build_tree(
    root: PathBuf,
    timeout: Duration,
    cancel: CancellationToken,
) -> Result<Arc<DirNode>, AppError> {
    build_tree_with(FsDirReader::new(), root, timeout, cancel).await
}

/// Same as [`build_tree`] over an arbitrary reader.
///
/// On timeout the token is cancelled so the blocking walk stops at the next
/// directory boundary, and `AppError::ScanTimeout` is returned.
pub async fn build_tree_with<R>(
    reader: R,
    root: PathBuf,
    timeout: Duration,
    cancel: CancellationToken,
) -> Result<Arc<DirNode>, AppError>
where
    R: DirReader + 'static,
{
    let span = tracing::info_span!(
        "tree_build",
        operation_type = "tree_build",
        root = %root.display()
    );

    async move {
        let walker_cancel = cancel.clone();
        let walk_root = root.clone();

        let handle = TokioScheduler::spawn_blocking(move || {
            TreeBuilder::new(reader, walker_cancel).build(&walk_root)
        });

        tokio::select! {
            joined = tokio::time::timeout(timeout, handle) => match joined {
                Ok(result) => flatten_join(result),
                Err(_) => {
                    cancel.cancel();
                    warn!(
                        marker = "TREE_BUILD",
                        operation_type = "tree_build_timeout",
                        timeout_ms = timeout.as_millis(),
                        "Tree build timed out"
                    );
                    Err(AppError::ScanTimeout { path: root, timeout })
                }
            },
            () = cancel.cancelled() => {
                debug!(marker = "TREE_BUILD", operation_type = "tree_build_cancelled", "Tree build cancelled");
                Err(AppError::Cancelled)
            }
        }
    }
    .instrument(span)
    .await
}

/// Build the newer and older trees concurrently and join them.
///
/// If either build fails, the other is cancelled and the first error wins.
pub async fn build_pair(
    newer: PathBuf,
    older: PathBuf,
    timeout: Duration,
    cancel: CancellationToken,
) -> Result<(Arc<DirNode>, Arc<DirNode>), AppError> {
    let pair_cancel = cancel.child_token();

    let result = tokio::try_join!(
        build_tree(newer, timeout, pair_cancel.clone()),
        build_tree(older, timeout, pair_cancel.clone()),
    );

    if result.is_err() {
        pair_cancel.cancel();
    }

    result
}

fn flatten_join(
    result: Result<Result<Arc<DirNode>, AppError>, JoinError>,
) -> Result<Arc<DirNode>, AppError> {
    match result {
        Ok(inner) => inner,
        Err(e) => Err(AppError::Other(format!("tree build task failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::dir_reader::DirEntryInfo;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, len: usize) {
        fs::write(path, vec![0u8; len]).unwrap();
    }

    fn sample_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(&root.join("big.bin"), 300);
        fs::create_dir_all(root.join("docs/nested")).unwrap();
        write(&root.join("docs/a.txt"), 40);
        write(&root.join("docs/b.txt"), 40);
        write(&root.join("docs/nested/c.txt"), 20);
        fs::create_dir(root.join("empty")).unwrap();
        tmp
    }

    fn assert_sums(node: &DirNode) {
        if node.is_dir() {
            let sum: u64 = node.children.iter().map(|c| c.size).sum();
            assert_eq!(node.size, sum, "size mismatch at {:?}", node.path);
            for child in &node.children {
                assert_sums(child);
            }
        }
    }

    fn assert_sorted(node: &DirNode) {
        for pair in node.children.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.size > b.size || (a.size == b.size && a.name < b.name));
        }
        node.children.iter().for_each(|c| assert_sorted(c));
    }

    fn builder() -> TreeBuilder<FsDirReader> {
        TreeBuilder::new(FsDirReader::new(), CancellationToken::new())
    }

    #[test]
    fn sizes_aggregate_and_children_sort() {
        let tmp = sample_tree();
        let tree = builder().build(tmp.path()).unwrap();

        assert_eq!(tree.size, 400);
        assert_eq!(tree.name, tmp.path().to_string_lossy());
        assert_sums(&tree);
        assert_sorted(&tree);

        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["big.bin", "docs", "empty"]);

        let docs = &tree.children[1];
        let docs_names: Vec<&str> = docs.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(docs_names, ["a.txt", "b.txt", "nested"]);
        assert_eq!(docs.children[2].path, tmp.path().join("docs/nested"));
    }

    #[test]
    fn walk_counts_every_node_once() {
        let tmp = sample_tree();
        let (tree, nodes) = builder().walk(tmp.path()).unwrap();
        assert_eq!(tree.size, 400);
        // root, big.bin, docs, a.txt, b.txt, nested, c.txt, empty
        assert_eq!(nodes, 8);

        let file_root = tmp.path().join("big.bin");
        let (leaf, nodes) = builder().walk(&file_root).unwrap();
        assert_eq!((leaf.size, nodes), (300, 1));
    }

    #[test]
    fn rebuild_is_identical() {
        let tmp = sample_tree();
        let first = builder().build(tmp.path()).unwrap();
        let second = builder().build(tmp.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn nonexistent_root_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = builder().build(&tmp.path().join("nope")).unwrap_err();
        assert!(err.is_io(), "expected io error, got {err:?}");
    }

    #[test]
    fn cancelled_token_aborts_build() {
        let tmp = sample_tree();
        let token = CancellationToken::new();
        token.cancel();

        let err = TreeBuilder::new(FsDirReader::new(), token)
            .build(tmp.path())
            .unwrap_err();
        assert!(matches!(err, AppError::Cancelled));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loop_terminates() {
        let tmp = sample_tree();
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("docs/loop")).unwrap();

        let tree = builder().build(tmp.path()).unwrap();
        let docs = tree.children.iter().find(|c| c.name == "docs").unwrap();
        let link = docs.children.iter().find(|c| c.name == "loop").unwrap();
        assert_eq!(link.kind, NodeKind::Symlink);
        assert!(!link.has_children());
        assert_sums(&tree);
    }

    /// Reader that fails on one directory to check the build aborts.
    struct FailingReader {
        fail_on: PathBuf,
    }

    impl DirReader for FailingReader {
        fn stat(&self, path: &Path) -> Result<DirEntryInfo, AppError> {
            FsDirReader::new().stat(path)
        }

        fn read_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>, AppError> {
            if path == self.fail_on {
                return Err(AppError::read_dir(
                    path,
                    std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                ));
            }
            FsDirReader::new().read_dir(path)
        }
    }

    #[test]
    fn unreadable_subdirectory_aborts_whole_build() {
        let tmp = sample_tree();
        let reader = FailingReader {
            fail_on: tmp.path().join("docs/nested"),
        };

        let err = TreeBuilder::new(reader, CancellationToken::new())
            .build(tmp.path())
            .unwrap_err();
        assert!(matches!(err, AppError::ReadDir { .. }));
    }

    /// Reader that stalls on every listing.
    struct SlowReader;

    impl DirReader for SlowReader {
        fn stat(&self, path: &Path) -> Result<DirEntryInfo, AppError> {
            FsDirReader::new().stat(path)
        }

        fn read_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>, AppError> {
            std::thread::sleep(Duration::from_millis(300));
            FsDirReader::new().read_dir(path)
        }
    }

    #[tokio::test]
    async fn stalled_walk_times_out_and_cancels() {
        let tmp = sample_tree();
        let token = CancellationToken::new();

        let err = build_tree_with(
            SlowReader,
            tmp.path().to_path_buf(),
            Duration::from_millis(20),
            token.clone(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::ScanTimeout { .. }));
        assert!(err.is_io());
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn pair_builds_both_roots() {
        let newer = sample_tree();
        let older = TempDir::new().unwrap();
        write(&older.path().join("big.bin"), 100);

        let (n, o) = build_pair(
            newer.path().to_path_buf(),
            older.path().to_path_buf(),
            Duration::from_secs(30),
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(n.size, 400);
        assert_eq!(o.size, 100);
    }

    #[tokio::test]
    async fn pair_fails_when_one_root_is_missing() {
        let newer = sample_tree();
        let missing = newer.path().join("missing-root");

        let err = build_pair(
            newer.path().to_path_buf(),
            missing,
            Duration::from_secs(30),
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(err.is_io());
    }
}
