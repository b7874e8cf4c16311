//! ``src/model/app_state.rs``
//! ============================================================================
//! # `AppState`: Everything the Renderer Reads
//!
//! One screen is active at a time. The selector survives a comparison so
//! going back keeps the chosen slots; the comparison session (both trees
//! and the navigation stack) is dropped on the way back.

use std::sync::Arc;

use crate::{
    fs::dir_node::DirNode,
    model::{
        navigation::{NavCommand, NavigationController},
        selector::SelectorState,
        snapshot::SnapshotPair,
        ui_state::UIState,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Selector,
    Compare,
}

/// A running comparison: the pair being compared and its navigation.
#[derive(Debug, Clone)]
pub struct CompareSession {
    pub pair: SnapshotPair,
    pub nav: NavigationController,
}

impl CompareSession {
    #[must_use]
    pub fn new(pair: SnapshotPair, newer: Arc<DirNode>, older: Arc<DirNode>) -> Self {
        Self {
            pair,
            nav: NavigationController::new(newer, older),
        }
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub screen: Screen,
    pub selector: SelectorState,
    pub compare: Option<CompareSession>,
    pub ui: UIState,
    /// Started with two explicit directories; there is no selector to
    /// return to.
    pub direct_mode: bool,
    /// Last known terminal size, applied to new sessions.
    pub viewport: (u16, u16),
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ui: UIState::new(),
            viewport: (80, 24),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn direct() -> Self {
        Self {
            direct_mode: true,
            ..Self::new()
        }
    }

    /// Switch to the compare screen for freshly built trees.
    pub fn open_compare(&mut self, pair: SnapshotPair, newer: Arc<DirNode>, older: Arc<DirNode>) {
        let mut session = CompareSession::new(pair, newer, older);
        let (width, height) = self.viewport;
        session.nav.apply(NavCommand::Resize { width, height });

        self.compare = Some(session);
        self.screen = Screen::Compare;
        self.ui.request_redraw();
    }

    /// Drop the comparison and show the selector again.
    pub fn close_compare(&mut self) {
        self.compare = None;
        self.screen = Screen::Selector;
        self.ui.request_redraw();
    }
}
