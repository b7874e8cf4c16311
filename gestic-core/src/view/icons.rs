//! src/view/icons.rs
//! ============================================================================
//! # Entry Icons (Nerd Fonts)
//!
//! Icons for the comparison table's name columns, chosen by node kind.

use crate::fs::dir_node::NodeKind;

pub const FOLDER_ICON: &str = "\u{f07b}";
pub const FILE_ICON: &str = "\u{f15b}";
pub const SYMLINK_ICON: &str = "\u{f0c1}";
pub const OTHER_ICON: &str = "\u{f013}";

/// Icon for `kind`; the missing placeholder has none.
#[must_use]
pub const fn for_kind(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Dir => FOLDER_ICON,
        NodeKind::File => FILE_ICON,
        NodeKind::Symlink => SYMLINK_ICON,
        NodeKind::Other => OTHER_ICON,
        NodeKind::Missing => "",
    }
}
