//! ``src/tasks/compare_task.rs``
//! ============================================================================
//! # Compare Task: Background Build of Both Snapshot Trees
//!
//! Builds the newer and older trees concurrently off the UI task and reports
//! back through the task channel. The UI keeps handling keys meanwhile, so
//! `esc` can cancel the walk.

use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span, warn};

use crate::{
    controller::event_loop::TaskResult, fs::tree_builder::build_pair, model::snapshot::SnapshotPair,
};

/// Spawn the pair build. Exactly one `TaskResult::TreesLoaded` is sent.
pub fn spawn_compare_task(
    generation: u64,
    pair: SnapshotPair,
    scan_timeout: Duration,
    cancel: CancellationToken,
    task_tx: UnboundedSender<TaskResult>,
) {
    let span = info_span!(
        "compare_task",
        operation_type = "compare_task",
        generation,
        newer = %pair.newer_id,
        older = %pair.older_id,
    );

    tokio::spawn(
        async move {
            let start = Instant::now();
            let result = build_pair(
                pair.newer_path.clone(),
                pair.older_path.clone(),
                scan_timeout,
                cancel,
            )
            .await;

            match &result {
                Ok((newer, older)) => info!(
                    marker = "COMPARE_READY",
                    operation_type = "compare_task_complete",
                    newer_size = newer.size,
                    older_size = older.size,
                    duration_ms = start.elapsed().as_millis(),
                    "Both trees built"
                ),
                Err(e) => warn!(
                    marker = "COMPARE_FAILED",
                    operation_type = "compare_task_failed",
                    error = %e,
                    "Tree build failed"
                ),
            }

            let loaded = TaskResult::TreesLoaded { generation, pair, result };
            if task_tx.send(loaded).is_err() {
                warn!("Task channel closed before trees were delivered");
            }
        }
        .instrument(span),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn delivers_both_trees() {
        let newer = TempDir::new().unwrap();
        let older = TempDir::new().unwrap();
        fs::write(newer.path().join("f"), [0u8; 64]).unwrap();
        fs::write(older.path().join("f"), [0u8; 16]).unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let pair = SnapshotPair::from_dirs(newer.path().to_path_buf(), older.path().to_path_buf());
        spawn_compare_task(7, pair.clone(), Duration::from_secs(30), CancellationToken::new(), tx);

        match rx.recv().await.unwrap() {
            TaskResult::TreesLoaded { generation, pair: got, result } => {
                assert_eq!(generation, 7);
                assert_eq!(got, pair);
                let (n, o) = result.unwrap();
                assert_eq!((n.size, o.size), (64, 16));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancellation_is_reported() {
        let newer = TempDir::new().unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let pair = SnapshotPair::from_dirs(newer.path().to_path_buf(), newer.path().to_path_buf());
        spawn_compare_task(1, pair, Duration::from_secs(30), token, tx);

        match rx.recv().await.unwrap() {
            TaskResult::TreesLoaded { result, .. } => {
                assert!(matches!(result, Err(crate::error::AppError::Cancelled)));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
