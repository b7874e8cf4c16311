//! ``src/model/diff.rs``
//! ============================================================================
//! # Diff/Match Engine
//!
//! Compares the immediate children of two [`DirNode`]s and produces one
//! [`ComparisonRow`] per entry name found on either side, ranked by signed
//! size delta (largest growth first, largest shrinkage last).
//!
//! Entries are matched by their bare name at the current level. A directory
//! renamed or moved between snapshots therefore shows up as one older-only
//! row plus one newer-only row, never as a matched pair.
//!
//! Both sides are indexed in name-keyed maps, so a comparison is linear in
//! the number of entries.

use std::{cmp::Ordering, sync::Arc};

use ahash::AHashMap;
use compact_str::CompactString;

use crate::fs::dir_node::DirNode;

/// Which sides of a row carry a real entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMatch {
    Both,
    NewerOnly,
    OlderOnly,
}

/// One diffed entry. The absent side of an unmatched row is a
/// [`DirNode::missing`] placeholder, so both sides are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    pub name: CompactString,
    pub newer: Arc<DirNode>,
    pub older: Arc<DirNode>,
    /// `newer.size - older.size`, absent side counted as zero.
    pub signed_delta: i64,
    pub abs_delta: u64,
}

impl ComparisonRow {
    fn new(name: CompactString, newer: Arc<DirNode>, older: Arc<DirNode>) -> Self {
        let delta = i128::from(newer.size) - i128::from(older.size);
        let signed_delta = i64::try_from(delta).unwrap_or(if delta > 0 { i64::MAX } else { i64::MIN });

        Self {
            name,
            newer,
            older,
            signed_delta,
            abs_delta: signed_delta.unsigned_abs(),
        }
    }

    #[must_use]
    pub fn matching(&self) -> RowMatch {
        match (self.newer.is_missing(), self.older.is_missing()) {
            (false, false) => RowMatch::Both,
            (false, true) => RowMatch::NewerOnly,
            _ => RowMatch::OlderOnly,
        }
    }
}

/// Diff the immediate children of `newer` and `older`.
///
/// Pure: the same inputs always give the same rows in the same order.
#[must_use]
pub fn diff(newer: &DirNode, older: &DirNode) -> Vec<ComparisonRow> {
    let newer_by_name: AHashMap<&str, &Arc<DirNode>> = index_by_name(&newer.children);
    let older_by_name: AHashMap<&str, &Arc<DirNode>> = index_by_name(&older.children);

    let mut rows: Vec<ComparisonRow> = Vec::with_capacity(newer_by_name.len() + older_by_name.len());

    for child in &newer.children {
        let counterpart = older_by_name
            .get(child.name.as_str())
            .map_or_else(|| Arc::new(DirNode::missing(child.name.clone())), |n| Arc::clone(n));
        rows.push(ComparisonRow::new(child.name.clone(), Arc::clone(child), counterpart));
    }

    for child in &older.children {
        if newer_by_name.contains_key(child.name.as_str()) {
            continue;
        }
        rows.push(ComparisonRow::new(
            child.name.clone(),
            Arc::new(DirNode::missing(child.name.clone())),
            Arc::clone(child),
        ));
    }

    rows.sort_by(|a: &ComparisonRow, b: &ComparisonRow| -> Ordering {
        b.signed_delta
            .cmp(&a.signed_delta)
            .then_with(|| a.name.cmp(&b.name))
    });

    rows
}

fn index_by_name(children: &[Arc<DirNode>]) -> AHashMap<&str, &Arc<DirNode>> {
    children
        .iter()
        .map(|child| (child.name.as_str(), child))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::dir_node::test_support::{dir, file};
    use std::{collections::HashSet, path::Path};

    fn pair(newer: Vec<(&str, u64)>, older: Vec<(&str, u64)>) -> (Arc<DirNode>, Arc<DirNode>) {
        let n = Path::new("/snap/new");
        let o = Path::new("/snap/old");
        (
            dir(n, "root", newer.into_iter().map(|(k, s)| file(n, k, s)).collect()),
            dir(o, "root", older.into_iter().map(|(k, s)| file(o, k, s)).collect()),
        )
    }

    #[test]
    fn ranks_growth_match_and_shrinkage() {
        let (newer, older) = pair(vec![("x", 100), ("y", 50)], vec![("y", 40), ("z", 10)]);
        let rows = diff(&newer, &older);

        let summary: Vec<(&str, i64, RowMatch)> = rows
            .iter()
            .map(|r| (r.name.as_str(), r.signed_delta, r.matching()))
            .collect();
        assert_eq!(
            summary,
            [
                ("x", 100, RowMatch::NewerOnly),
                ("y", 10, RowMatch::Both),
                ("z", -10, RowMatch::OlderOnly),
            ]
        );
        assert_eq!(rows[2].abs_delta, 10);
        assert!(rows[0].older.is_missing());
        assert!(rows[2].newer.is_missing());
    }

    #[test]
    fn one_row_per_name_in_union() {
        let (newer, older) = pair(
            vec![("a", 1), ("b", 2), ("c", 3), ("d", 4)],
            vec![("c", 3), ("d", 9), ("e", 1), ("f", 0)],
        );
        let rows = diff(&newer, &older);

        let names: HashSet<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(rows.len(), 6);
        assert_eq!(names.len(), 6);

        for row in &rows {
            let expected = i64::try_from(row.newer.size).unwrap() - i64::try_from(row.older.size).unwrap();
            assert_eq!(row.signed_delta, expected);
            assert_eq!(row.abs_delta, expected.unsigned_abs());
        }
    }

    #[test]
    fn equal_deltas_order_by_name() {
        let (newer, older) = pair(vec![("b", 5), ("a", 5), ("c", 5)], vec![("c", 5)]);
        let rows = diff(&newer, &older);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(rows[2].signed_delta, 0);
    }

    #[test]
    fn diff_is_pure() {
        let (newer, older) = pair(vec![("x", 7), ("y", 3)], vec![("x", 9), ("q", 3)]);
        assert_eq!(diff(&newer, &older), diff(&newer, &older));
    }

    #[test]
    fn matched_rows_share_nodes() {
        let (newer, older) = pair(vec![("x", 7)], vec![("x", 9)]);
        let rows = diff(&newer, &older);
        assert!(Arc::ptr_eq(&rows[0].newer, &newer.children[0]));
        assert!(Arc::ptr_eq(&rows[0].older, &older.children[0]));
    }

    #[test]
    fn empty_sides_give_no_rows() {
        let (newer, older) = pair(vec![], vec![]);
        assert!(diff(&newer, &older).is_empty());
    }

    #[test]
    fn huge_sizes_saturate() {
        let n = Path::new("/n");
        let newer = dir(n, "r", vec![file(n, "big", u64::MAX)]);
        let older = dir(n, "r", vec![]);
        let rows = diff(&newer, &older);
        assert_eq!(rows[0].signed_delta, i64::MAX);
    }
}
