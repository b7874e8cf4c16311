//! ``src/restic/consistency.rs``
//! ============================================================================
//! # Mount Consistency Check
//!
//! `restic mount` exposes every snapshot as `<mount>/snapshots/<RFC3339>`,
//! plus a `latest` symlink. Each directory must correspond to a listed
//! snapshot and each listed snapshot must have a directory; otherwise the
//! listing and the mount are out of sync and nothing can be compared.
//!
//! Directory names carry an offset, the listing prints local wall-clock
//! time. The two are compared on the directory's local time so no timezone
//! has to be assumed.

use std::path::Path;

use chrono::{DateTime, FixedOffset};
use tracing::{debug, instrument};

use crate::{
    error::AppError,
    fs::dir_reader::{DirReader, FsDirReader},
    model::snapshot::Snapshot,
    restic::parser::ListedSnapshot,
};

/// Name of the symlink restic keeps to the most recent snapshot.
pub const LATEST_LINK: &str = "latest";

/// Match `listed` against `<mount>/snapshots` and return the mounted
/// snapshots oldest-first.
#[instrument(level = "debug", skip(listed), fields(mount = %mount.display(), listed = listed.len()))]
pub fn check_mount(listed: Vec<ListedSnapshot>, mount: &Path) -> Result<Vec<Snapshot>, AppError> {
    check_mount_with(&FsDirReader::new(), listed, mount)
}

pub fn check_mount_with<R: DirReader>(
    reader: &R,
    listed: Vec<ListedSnapshot>,
    mount: &Path,
) -> Result<Vec<Snapshot>, AppError> {
    let snapshots_dir = mount.join("snapshots");
    let entries = reader.read_dir(&snapshots_dir).map_err(|e| {
        AppError::consistency(format!(
            "{} directory missing or not mounted: {e}",
            snapshots_dir.display()
        ))
    })?;

    let mut slots: Vec<(ListedSnapshot, Option<Snapshot>)> =
        listed.into_iter().map(|l| (l, None)).collect();

    for entry in entries {
        if entry.name == LATEST_LINK {
            continue;
        }

        let timestamp = entry_timestamp(&entry.name)?;
        let local = timestamp.naive_local();

        let Some((listed, slot)) = slots
            .iter_mut()
            .find(|(l, slot)| slot.is_none() && l.local_time == local)
        else {
            return Err(AppError::consistency(format!(
                "mismatch entries for snapshot {}",
                entry.name
            )));
        };

        debug!(id = %listed.id, dir = %entry.name, "snapshot matched to mount directory");
        *slot = Some(Snapshot {
            id: listed.id.clone(),
            timestamp,
            size_label: listed.size_label.clone(),
            mount_path: entry.path,
        });
    }

    let mut snapshots: Vec<Snapshot> = slots
        .into_iter()
        .map(|(listed, slot)| {
            slot.ok_or_else(|| {
                AppError::consistency(format!(
                    "snapshot {} ({}) has no mounted directory",
                    listed.id, listed.local_time
                ))
            })
        })
        .collect::<Result<_, _>>()?;

    snapshots.sort_by_key(|s| s.timestamp);
    Ok(snapshots)
}

/// Timestamp of a mount directory. restic appends `-1`, `-2`, ... when
/// several snapshots share a timestamp; those names get their own error.
fn entry_timestamp(name: &str) -> Result<DateTime<FixedOffset>, AppError> {
    DateTime::parse_from_rfc3339(name).map_err(|e| {
        match DateTime::parse_and_remainder(name, "%+") {
            Ok((_, suffix)) => AppError::consistency(format!(
                "mount entry {name:?} has suffix {suffix:?} after its timestamp; \
                 snapshots sharing a timestamp are not supported"
            )),
            Err(_) => AppError::consistency(format!("unexpected entry {name:?}: {e}")),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use compact_str::CompactString;
    use std::fs;
    use tempfile::TempDir;

    fn listed(id: &str, time: &str) -> ListedSnapshot {
        ListedSnapshot {
            id: CompactString::from(id),
            local_time: NaiveDateTime::parse_from_str(time, "%Y-%m-%d %H:%M:%S").unwrap(),
            size_label: String::new(),
        }
    }

    fn mount_with(dirs: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("snapshots")).unwrap();
        for d in dirs {
            fs::create_dir(tmp.path().join("snapshots").join(d)).unwrap();
        }
        tmp
    }

    #[test]
    fn matches_by_local_time_and_orders_oldest_first() {
        let mount = mount_with(&["2024-05-08T10:00:05+02:00", "2024-05-01T10:00:00+02:00"]);
        #[cfg(unix)]
        std::os::unix::fs::symlink(
            mount.path().join("snapshots/2024-05-08T10:00:05+02:00"),
            mount.path().join("snapshots/latest"),
        )
        .unwrap();

        let snapshots = check_mount(
            vec![
                listed("newer", "2024-05-08 10:00:05"),
                listed("older", "2024-05-01 10:00:00"),
            ],
            mount.path(),
        )
        .unwrap();

        let ids: Vec<&str> = snapshots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["older", "newer"]);
        assert_eq!(
            snapshots[0].mount_path,
            mount.path().join("snapshots/2024-05-01T10:00:00+02:00")
        );
        assert_eq!(snapshots[0].timestamp.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn unmounted_repository_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let err = check_mount(vec![listed("a", "2024-05-01 10:00:00")], tmp.path()).unwrap_err();
        assert!(matches!(err, AppError::Consistency { .. }));
        assert!(err.to_string().contains("not mounted"));
    }

    #[test]
    fn directory_without_snapshot_is_rejected() {
        let mount = mount_with(&["2024-05-01T10:00:00+00:00", "2024-06-01T10:00:00+00:00"]);
        let err = check_mount(vec![listed("a", "2024-05-01 10:00:00")], mount.path()).unwrap_err();
        assert!(err.to_string().contains("2024-06-01T10:00:00+00:00"));
    }

    #[test]
    fn snapshot_without_directory_is_rejected() {
        let mount = mount_with(&["2024-05-01T10:00:00+00:00"]);
        let err = check_mount(
            vec![
                listed("a", "2024-05-01 10:00:00"),
                listed("b", "2024-05-02 10:00:00"),
            ],
            mount.path(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("snapshot b"));
    }

    #[test]
    fn non_timestamp_entry_is_rejected() {
        let mount = mount_with(&["2024-05-01T10:00:00+00:00", "lost+found"]);
        let err = check_mount(vec![listed("a", "2024-05-01 10:00:00")], mount.path()).unwrap_err();
        assert!(matches!(err, AppError::Consistency { .. }));
    }

    #[test]
    fn shared_timestamp_suffix_gets_its_own_message() {
        let mount = mount_with(&["2024-05-01T10:00:00+00:00", "2024-05-01T10:00:00+00:00-1"]);
        let err = check_mount(
            vec![
                listed("a", "2024-05-01 10:00:00"),
                listed("b", "2024-05-01 10:00:00"),
            ],
            mount.path(),
        )
        .unwrap_err();

        assert!(matches!(err, AppError::Consistency { .. }));
        let msg = err.to_string();
        assert!(msg.contains("suffix \"-1\""), "{msg}");
        assert!(!msg.contains("unexpected entry"), "{msg}");

        let utc = entry_timestamp("2024-05-01T10:00:00Z-2").unwrap_err();
        assert!(utc.to_string().contains("suffix \"-2\""));
    }
}
