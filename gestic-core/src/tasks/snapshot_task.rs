//! ``src/tasks/snapshot_task.rs``
//! ============================================================================
//! # Snapshot Task: Background Snapshot Listing
//!
//! Runs a [`SnapshotSource`] off the UI task and reports the oldest-first
//! list (or the failure) through the task channel.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{Instrument, info_span, warn};

use crate::{controller::event_loop::TaskResult, restic::SnapshotSource};

/// Spawn the listing. Exactly one `TaskResult::SnapshotsLoaded` is sent.
pub fn spawn_snapshot_task<S>(source: Arc<S>, task_tx: UnboundedSender<TaskResult>)
where
    S: SnapshotSource + 'static,
{
    let span = info_span!("snapshot_task", operation_type = "snapshot_task");

    tokio::spawn(
        async move {
            let result = source.list_snapshots().await;
            if task_tx.send(TaskResult::SnapshotsLoaded(result)).is_err() {
                warn!("Task channel closed before snapshots were delivered");
            }
        }
        .instrument(span),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, model::snapshot::{Snapshot, test_support::snapshot}};
    use tokio::sync::mpsc;

    struct FixedSource(Result<Vec<Snapshot>, AppError>);

    impl SnapshotSource for FixedSource {
        async fn list_snapshots(&self) -> Result<Vec<Snapshot>, AppError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn forwards_listing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_snapshot_task(Arc::new(FixedSource(Ok(vec![snapshot("a", 1)]))), tx);

        match rx.recv().await.unwrap() {
            TaskResult::SnapshotsLoaded(Ok(list)) => assert_eq!(list[0].id, "a"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn forwards_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_snapshot_task(
            Arc::new(FixedSource(Err(AppError::consistency("not mounted")))),
            tx,
        );

        assert!(matches!(
            rx.recv().await.unwrap(),
            TaskResult::SnapshotsLoaded(Err(AppError::Consistency { .. }))
        ));
    }
}
