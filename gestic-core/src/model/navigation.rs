//! ``src/model/navigation.rs``
//! ============================================================================
//! # Navigation Controller: Lock-Step Drill-Down Over Two Trees
//!
//! A [`NavigationFrame`] is an immutable `(newer, older, cursor)` value with
//! the frame's diff rows cached alongside. Frames live on a persistent
//! [`NavigationStack`]: every transition returns a new stack that shares its
//! lower frames with the old one, and the old stack stays valid. Frames hold
//! `Arc`s into the already-built trees, never copies of subtrees.
//!
//! [`NavigationController`] owns the current stack for a comparison session
//! together with the viewport size and the two snapshot roots used for
//! path export.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, trace};

use crate::{
    fs::dir_node::DirNode,
    model::diff::{ComparisonRow, diff},
};

/// Rows lost to the table border, header and export footer.
const VIEWPORT_CHROME_ROWS: u16 = 9;

// ------------------------------------------------------------
// NavigationFrame
// ------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NavigationFrame {
    newer: Arc<DirNode>,
    older: Arc<DirNode>,
    cursor: usize,
    rows: Arc<[ComparisonRow]>,
}

impl NavigationFrame {
    /// Frame for a node pair with the cursor on the first row.
    #[must_use]
    pub fn new(newer: Arc<DirNode>, older: Arc<DirNode>) -> Self {
        let rows: Arc<[ComparisonRow]> = diff(&newer, &older).into();
        Self {
            newer,
            older,
            cursor: 0,
            rows,
        }
    }

    /// Same frame with the cursor clamped into `[0, rows - 1]`.
    #[must_use]
    pub fn with_cursor(&self, cursor: usize) -> Self {
        Self {
            newer: Arc::clone(&self.newer),
            older: Arc::clone(&self.older),
            cursor: clamp_cursor(cursor, self.rows.len()),
            rows: Arc::clone(&self.rows),
        }
    }

    #[must_use]
    pub const fn newer(&self) -> &Arc<DirNode> {
        &self.newer
    }

    #[must_use]
    pub const fn older(&self) -> &Arc<DirNode> {
        &self.older
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    #[must_use]
    pub fn selected_row(&self) -> Option<&ComparisonRow> {
        self.rows.get(self.cursor)
    }

    /// Same node identities and cursor.
    #[must_use]
    pub fn same_position(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.newer, &other.newer)
            && Arc::ptr_eq(&self.older, &other.older)
            && self.cursor == other.cursor
    }
}

fn clamp_cursor(cursor: usize, row_count: usize) -> usize {
    cursor.min(row_count.saturating_sub(1))
}

// ------------------------------------------------------------
// NavigationStack
// ------------------------------------------------------------

#[derive(Debug)]
struct StackLink {
    frame: NavigationFrame,
    below: Option<Arc<StackLink>>,
    depth: usize,
}

/// Persistent stack of frames. Cloning is a reference-count bump.
#[derive(Debug, Clone)]
pub struct NavigationStack {
    top: Arc<StackLink>,
}

/// Why a transition left the stack untouched. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOp {
    /// Enter on a file, an empty directory or a missing placeholder.
    NothingToEnter,
    /// Leave at the root frame.
    NothingToLeave,
    /// The active frame has no rows.
    NoRows,
    /// Cursor already at the requested position.
    CursorUnchanged,
}

#[derive(Debug, Clone)]
pub enum Transition {
    Changed(NavigationStack),
    NoOp(NoOp),
}

impl Transition {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp(_))
    }
}

impl NavigationStack {
    /// Single root frame over the two snapshot roots.
    #[must_use]
    pub fn new(newer_root: Arc<DirNode>, older_root: Arc<DirNode>) -> Self {
        Self {
            top: Arc::new(StackLink {
                frame: NavigationFrame::new(newer_root, older_root),
                below: None,
                depth: 1,
            }),
        }
    }

    #[must_use]
    pub fn current(&self) -> &NavigationFrame {
        &self.top.frame
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.top.depth
    }

    fn push(&self, frame: NavigationFrame) -> Self {
        Self {
            top: Arc::new(StackLink {
                frame,
                below: Some(Arc::clone(&self.top)),
                depth: self.top.depth + 1,
            }),
        }
    }

    fn replace_top(&self, frame: NavigationFrame) -> Self {
        Self {
            top: Arc::new(StackLink {
                frame,
                below: self.top.below.clone(),
                depth: self.top.depth,
            }),
        }
    }

    /// Drill into the row under the cursor.
    ///
    /// The pushed frame pairs the row's newer node with the older node the
    /// diff matched by name among the current frame's older children, or
    /// the missing placeholder when there was no match.
    #[must_use]
    pub fn enter(&self) -> Transition {
        let frame = self.current();
        let Some(row) = frame.selected_row() else {
            return Transition::NoOp(NoOp::NoRows);
        };

        if !row.newer.has_children() {
            trace!(name = %row.name, "enter on leaf is a no-op");
            return Transition::NoOp(NoOp::NothingToEnter);
        }

        let next = NavigationFrame::new(Arc::clone(&row.newer), Arc::clone(&row.older));
        debug!(
            marker = "NAVIGATION",
            operation_type = "enter",
            name = %row.name,
            depth = self.depth() + 1,
            rows = next.rows().len(),
            "Entered directory pair"
        );
        Transition::Changed(self.push(next))
    }

    /// Return to the parent frame with its stored cursor.
    #[must_use]
    pub fn leave(&self) -> Transition {
        match self.top.below.as_ref() {
            Some(below) => {
                debug!(
                    marker = "NAVIGATION",
                    operation_type = "leave",
                    depth = below.depth,
                    "Left directory pair"
                );
                Transition::Changed(Self {
                    top: Arc::clone(below),
                })
            }
            None => Transition::NoOp(NoOp::NothingToLeave),
        }
    }

    /// Move the cursor by `delta` rows, clamped to the row range.
    #[must_use]
    pub fn move_cursor(&self, delta: isize) -> Transition {
        let frame = self.current();
        self.set_cursor(frame.cursor().saturating_add_signed(delta))
    }

    /// Put the cursor on `index`, clamped to the row range.
    #[must_use]
    pub fn set_cursor(&self, index: usize) -> Transition {
        let frame = self.current();
        if frame.rows().is_empty() {
            return Transition::NoOp(NoOp::NoRows);
        }

        let moved = frame.with_cursor(index);
        if moved.cursor() == frame.cursor() {
            Transition::NoOp(NoOp::CursorUnchanged)
        } else {
            Transition::Changed(self.replace_top(moved))
        }
    }

    /// Re-apply the clamp rule to the active frame's cursor.
    #[must_use]
    pub fn clamp(&self) -> Transition {
        let frame = self.current();
        self.set_cursor(frame.cursor())
    }
}

// ------------------------------------------------------------
// Commands & controller
// ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Enter,
    Leave,
    MoveCursor(isize),
    First,
    Last,
    PageUp,
    PageDown,
    Resize { width: u16, height: u16 },
}

/// Up to three strings for the clipboard: newer path, older path and the
/// path relative to the snapshot root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportedPaths {
    pub fields: [Option<String>; 3],
}

impl ExportedPaths {
    /// `(slot number, text)` for every populated slot.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.fields
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_deref().map(|s| (i + 1, s)))
    }

    /// Field by 1-based slot number.
    #[must_use]
    pub fn field(&self, slot: usize) -> Option<&str> {
        slot.checked_sub(1)
            .and_then(|i| self.fields.get(i))
            .and_then(|f| f.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

impl Viewport {
    /// Rows moved by PageUp/PageDown.
    #[must_use]
    pub fn page_rows(&self) -> usize {
        usize::from(self.height.saturating_sub(VIEWPORT_CHROME_ROWS).max(1))
    }
}

/// Owns the comparison session's current stack.
#[derive(Debug, Clone)]
pub struct NavigationController {
    stack: NavigationStack,
    viewport: Viewport,
    newer_root: PathBuf,
    older_root: PathBuf,
}

impl NavigationController {
    #[must_use]
    pub fn new(newer_root: Arc<DirNode>, older_root: Arc<DirNode>) -> Self {
        let newer_path = newer_root.path.clone();
        let older_path = older_root.path.clone();
        Self {
            stack: NavigationStack::new(newer_root, older_root),
            viewport: Viewport::default(),
            newer_root: newer_path,
            older_root: older_path,
        }
    }

    #[must_use]
    pub const fn stack(&self) -> &NavigationStack {
        &self.stack
    }

    #[must_use]
    pub fn current(&self) -> &NavigationFrame {
        self.stack.current()
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Compute the transition for `cmd` without touching `self`.
    #[must_use]
    pub fn transition(&self, cmd: NavCommand) -> Transition {
        let page = isize::try_from(self.viewport.page_rows()).unwrap_or(isize::MAX);
        match cmd {
            NavCommand::Enter => self.stack.enter(),
            NavCommand::Leave => self.stack.leave(),
            NavCommand::MoveCursor(delta) => self.stack.move_cursor(delta),
            NavCommand::First => self.stack.set_cursor(0),
            NavCommand::Last => self.stack.set_cursor(usize::MAX),
            NavCommand::PageUp => self.stack.move_cursor(-page),
            NavCommand::PageDown => self.stack.move_cursor(page),
            NavCommand::Resize { .. } => self.stack.clamp(),
        }
    }

    /// Apply `cmd`, adopting the new stack when the transition changed it.
    /// Returns `false` for a no-op.
    pub fn apply(&mut self, cmd: NavCommand) -> bool {
        if let NavCommand::Resize { width, height } = cmd {
            self.viewport = Viewport { width, height };
        }

        match self.transition(cmd) {
            Transition::Changed(stack) => {
                self.stack = stack;
                true
            }
            Transition::NoOp(reason) => {
                trace!(?cmd, ?reason, "navigation no-op");
                false
            }
        }
    }

    /// Clipboard strings for the row at `row_index` of the active frame.
    /// Pure query.
    #[must_use]
    pub fn export(&self, row_index: usize) -> Option<ExportedPaths> {
        let row = self.current().rows().get(row_index)?;

        let relative = if row.newer.is_missing() {
            relative_to(&row.older.path, &self.older_root)
        } else {
            relative_to(&row.newer.path, &self.newer_root)
        };

        Some(ExportedPaths {
            fields: [
                row.newer.real_path().map(|p| p.display().to_string()),
                row.older.real_path().map(|p| p.display().to_string()),
                relative,
            ],
        })
    }

    /// Export for the row under the cursor.
    #[must_use]
    pub fn export_selected(&self) -> Option<ExportedPaths> {
        self.export(self.current().cursor())
    }

    /// Path of the active frame relative to the snapshot root, for titles.
    #[must_use]
    pub fn current_relative_path(&self) -> String {
        let frame = self.current();
        relative_to(&frame.newer().path, &self.newer_root)
            .or_else(|| relative_to(&frame.older().path, &self.older_root))
            .unwrap_or_else(|| "/".to_string())
    }
}

fn relative_to(path: &Path, root: &Path) -> Option<String> {
    if path.as_os_str().is_empty() {
        return None;
    }
    path.strip_prefix(root)
        .ok()
        .map(|rel| format!("/{}", rel.display()))
}
