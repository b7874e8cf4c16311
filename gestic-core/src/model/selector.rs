//! ``src/model/selector.rs``
//! ============================================================================
//! # Snapshot Selector State
//!
//! Two slots over the oldest-first snapshot list. Slot 1 and slot 2 never
//! hold the same row. Confirming with both slots filled yields a
//! [`SnapshotPair`] ordered by timestamp, whatever the slot order.

use crate::model::snapshot::{Snapshot, SnapshotPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectorState {
    snapshots: Vec<Snapshot>,
    cursor: usize,
    first: Option<usize>,
    second: Option<usize>,
}

impl SelectorState {
    /// Selector over `snapshots` with the cursor on the most recent one.
    #[must_use]
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        let cursor = snapshots.len().saturating_sub(1);
        Self {
            snapshots,
            cursor,
            first: None,
            second: None,
        }
    }

    #[must_use]
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Slot holding row `index`, if any.
    #[must_use]
    pub fn slot_of(&self, index: usize) -> Option<Slot> {
        if self.first == Some(index) {
            Some(Slot::First)
        } else if self.second == Some(index) {
            Some(Slot::Second)
        } else {
            None
        }
    }

    #[must_use]
    pub fn slot(&self, slot: Slot) -> Option<&Snapshot> {
        let index = match slot {
            Slot::First => self.first,
            Slot::Second => self.second,
        };
        index.and_then(|i| self.snapshots.get(i))
    }

    /// Move the cursor by `delta`, clamped to the list.
    pub fn move_cursor(&mut self, delta: isize) {
        self.set_cursor(self.cursor.saturating_add_signed(delta));
    }

    pub fn set_cursor(&mut self, index: usize) {
        self.cursor = index.min(self.snapshots.len().saturating_sub(1));
    }

    /// Put the cursor row into `slot`, removing it from the other slot.
    pub fn assign(&mut self, slot: Slot) {
        if self.snapshots.is_empty() {
            return;
        }
        let row = Some(self.cursor);
        match slot {
            Slot::First => {
                if self.second == row {
                    self.second = None;
                }
                self.first = row;
            }
            Slot::Second => {
                if self.first == row {
                    self.first = None;
                }
                self.second = row;
            }
        }
    }

    /// Fill slot 1 first, then slot 2. A row already in a slot is ignored.
    pub fn select(&mut self) {
        if self.snapshots.is_empty() || self.slot_of(self.cursor).is_some() {
            return;
        }
        if self.first.is_none() {
            self.first = Some(self.cursor);
        } else if self.second.is_none() {
            self.second = Some(self.cursor);
        }
    }

    pub fn clear(&mut self) {
        self.first = None;
        self.second = None;
    }

    /// The ordered pair, once both slots are filled.
    #[must_use]
    pub fn confirm(&self) -> Option<SnapshotPair> {
        match (self.slot(Slot::First), self.slot(Slot::Second)) {
            (Some(a), Some(b)) => Some(SnapshotPair::ordered(a, b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::snapshot::test_support::snapshot;

    fn selector() -> SelectorState {
        SelectorState::new(vec![
            snapshot("s1", 1),
            snapshot("s2", 2),
            snapshot("s3", 3),
        ])
    }

    #[test]
    fn cursor_starts_on_latest() {
        assert_eq!(selector().cursor(), 2);
        assert_eq!(SelectorState::new(vec![]).cursor(), 0);
    }

    #[test]
    fn select_fills_slots_in_order() {
        let mut s = selector();
        s.select();
        s.move_cursor(-2);
        s.select();

        assert_eq!(s.slot(Slot::First).unwrap().id, "s3");
        assert_eq!(s.slot(Slot::Second).unwrap().id, "s1");
        assert_eq!(s.slot_of(1), None);
    }

    #[test]
    fn select_twice_on_same_row_keeps_one_slot() {
        let mut s = selector();
        s.select();
        s.select();
        assert!(s.slot(Slot::Second).is_none());
        assert!(s.confirm().is_none());
    }

    #[test]
    fn assigning_row_moves_it_between_slots() {
        let mut s = selector();
        s.assign(Slot::First);
        s.assign(Slot::Second);
        assert!(s.slot(Slot::First).is_none());
        assert_eq!(s.slot_of(2), Some(Slot::Second));
    }

    #[test]
    fn confirm_orders_by_timestamp() {
        let mut s = selector();
        s.set_cursor(0);
        s.assign(Slot::First);
        s.set_cursor(1);
        s.assign(Slot::Second);

        let pair = s.confirm().unwrap();
        assert_eq!(pair.newer_id, "s2");
        assert_eq!(pair.older_id, "s1");
    }

    #[test]
    fn clear_empties_both_slots() {
        let mut s = selector();
        s.select();
        s.move_cursor(-1);
        s.select();
        assert!(s.confirm().is_some());

        s.clear();
        assert!(s.confirm().is_none());
        assert_eq!(s.slot_of(2), None);
    }

    #[test]
    fn cursor_clamps() {
        let mut s = selector();
        s.move_cursor(10);
        assert_eq!(s.cursor(), 2);
        s.move_cursor(-10);
        assert_eq!(s.cursor(), 0);
    }
}
