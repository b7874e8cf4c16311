//! ``src/model/snapshot.rs``
//! ============================================================================
//! # Snapshot Records
//!
//! A [`Snapshot`] is one listed restic snapshot that has been matched to its
//! mounted directory. A [`SnapshotPair`] is the selector's output: the two
//! roots to build, already ordered newer/older.

use std::{fmt, path::PathBuf};

use chrono::{DateTime, FixedOffset};
use compact_str::CompactString;

/// Display layout shared by the selector table and `--list` output.
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Short restic id.
    pub id: CompactString,

    /// Offset-aware time taken from the mounted directory name.
    pub timestamp: DateTime<FixedOffset>,

    /// Size column as restic printed it, e.g. `1.234 GiB`. May be empty.
    pub size_label: String,

    /// `<mount>/snapshots/<RFC3339>`.
    pub mount_path: PathBuf,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.id,
            self.timestamp.format(TIMESTAMP_LAYOUT),
            self.size_label
        )
    }
}

/// The two snapshots chosen for a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPair {
    pub newer_id: CompactString,
    pub newer_path: PathBuf,
    pub older_id: CompactString,
    pub older_path: PathBuf,
}

impl SnapshotPair {
    /// Order two snapshots so the later timestamp becomes `newer`.
    #[must_use]
    pub fn ordered(a: &Snapshot, b: &Snapshot) -> Self {
        let (newer, older) = if a.timestamp >= b.timestamp { (a, b) } else { (b, a) };
        Self {
            newer_id: newer.id.clone(),
            newer_path: newer.mount_path.clone(),
            older_id: older.id.clone(),
            older_path: older.mount_path.clone(),
        }
    }

    /// Pair two arbitrary directories; ids are their paths.
    #[must_use]
    pub fn from_dirs(newer: PathBuf, older: PathBuf) -> Self {
        Self {
            newer_id: CompactString::from(newer.to_string_lossy()),
            older_id: CompactString::from(older.to_string_lossy()),
            newer_path: newer,
            older_path: older,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Snapshot at `2024-05-<day> 10:00:00+00:00`.
    pub fn snapshot(id: &str, day: u32) -> Snapshot {
        let stamp = format!("2024-05-{day:02}T10:00:00+00:00");
        Snapshot {
            id: CompactString::from(id),
            timestamp: DateTime::parse_from_rfc3339(&stamp).unwrap(),
            size_label: "1.000 GiB".to_string(),
            mount_path: PathBuf::from("/mnt/restic/snapshots").join(stamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::snapshot;
    use super::*;

    #[test]
    fn later_snapshot_becomes_newer_in_either_order() {
        let early = snapshot("aaaa", 1);
        let late = snapshot("bbbb", 9);

        let p1 = SnapshotPair::ordered(&early, &late);
        let p2 = SnapshotPair::ordered(&late, &early);
        assert_eq!(p1, p2);
        assert_eq!(p1.newer_id, "bbbb");
        assert_eq!(p1.older_path, early.mount_path);
    }

    #[test]
    fn display_is_tab_separated() {
        let s = snapshot("abcd1234", 3);
        assert_eq!(s.to_string(), "abcd1234\t2024-05-03 10:00:00\t1.000 GiB");
    }
}
