//! src/controller/actions.rs
//! ============================================================================
//! # Actions: Centralized Application Commands
//!
//! Defines the `Action` enum, which represents all user inputs and internal
//! events the application responds to. Key handlers translate terminal
//! events into actions; the dispatcher applies them to the state.

use crate::{controller::event_loop::TaskResult, model::selector::Slot};

/// A high-level command, independent of the key that produced it.
#[derive(Debug, Clone)]
pub enum Action {
    /// Put the selector row into slot 1 or slot 2.
    AssignSlot(Slot),

    /// Cancel a running job, close an overlay, or go back to the selector.
    Cancel,

    /// Empty both selector slots.
    ClearSelection,

    /// Compare the two selected snapshots.
    ConfirmSelection,

    /// Copy export field 1, 2 or 3 of the row under the cursor.
    CopyField(usize),

    /// Drill into the row under the cursor.
    EnterSelected,

    /// Drill out to the parent frame.
    GoToParent,

    /// Move selection down.
    MoveSelectionDown,

    /// Move selection up.
    MoveSelectionUp,

    /// No operation. Used when an event is consumed but no state change is needed.
    NoOp,

    /// Page down (move selection down by viewport height).
    PageDown,

    /// Page up (move selection up by viewport height).
    PageUp,

    /// Quit the application.
    Quit,

    /// Terminal was resized.
    Resize(u16, u16),

    /// Fill slot 1, then slot 2, with the selector row.
    SelectSnapshot,

    /// Jump to first row.
    SelectFirst,

    /// Jump to last row.
    SelectLast,

    /// A background task finished.
    TaskResult(TaskResult),

    /// Periodic redraw for spinners and notification expiry.
    Tick,

    /// Show or hide the key help.
    ToggleHelp,
}
