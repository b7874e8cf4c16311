// gestic-core/src/controller/handlers/navigation_handler.rs
// Cursor movement shared by the selector and compare screens

use crate::controller::actions::Action;
use crate::error::AppError;
use crossterm::event::{KeyCode, KeyEvent};
use std::collections::HashMap;
use tracing::trace;

use super::*;

pub struct NavigationHandler {
    bindings: HashMap<KeyEvent, Action>,
    sequence_buffer: Vec<KeyEvent>,
}

impl Default for NavigationHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationHandler {
    pub fn new() -> Self {
        let mut bindings = HashMap::with_capacity(16);

        // Arrow keys
        bindings.insert(arrow_key(KeyCode::Up), Action::MoveSelectionUp);
        bindings.insert(arrow_key(KeyCode::Down), Action::MoveSelectionDown);

        // Page navigation
        bindings.insert(arrow_key(KeyCode::PageUp), Action::PageUp);
        bindings.insert(arrow_key(KeyCode::PageDown), Action::PageDown);
        bindings.insert(arrow_key(KeyCode::Home), Action::SelectFirst);
        bindings.insert(arrow_key(KeyCode::End), Action::SelectLast);

        // Vim keys
        bindings.insert(key('k'), Action::MoveSelectionUp);
        bindings.insert(key('j'), Action::MoveSelectionDown);
        bindings.insert(key('G'), Action::SelectLast);

        // Ctrl combinations
        bindings.insert(ctrl('u'), Action::PageUp);
        bindings.insert(ctrl('d'), Action::PageDown);
        bindings.insert(ctrl('b'), Action::PageUp);
        bindings.insert(ctrl('f'), Action::PageDown);

        Self {
            bindings,
            sequence_buffer: Vec::with_capacity(2),
        }
    }

    fn handle_key(&mut self, key_event: KeyEvent) -> Vec<Action> {
        trace!(
            marker = "NAVIGATION_HANDLER_KEY_EVENT",
            operation_type = "input_handling",
            "NavigationHandler: key {:?}",
            key_event
        );

        if let Some(action) = self.check_sequences(key_event) {
            return vec![action];
        }

        self.bindings.get(&key_event).cloned().into_iter().collect()
    }

    /// `gg` jumps to the first row.
    fn check_sequences(&mut self, key_event: KeyEvent) -> Option<Action> {
        if key_event.code != KeyCode::Char('g') {
            self.sequence_buffer.clear();
            return None;
        }

        self.sequence_buffer.push(key_event);
        if self.sequence_buffer.len() >= 2 {
            self.sequence_buffer.clear();
            Some(Action::SelectFirst)
        } else {
            Some(Action::NoOp)
        }
    }
}

impl EventHandler for NavigationHandler {
    fn can_handle(&self, ctx: KeyContext, key_event: &KeyEvent) -> bool {
        ctx.is_plain()
            && (self.bindings.contains_key(key_event) || key_event.code == KeyCode::Char('g'))
    }

    fn handle(&mut self, _ctx: KeyContext, key_event: KeyEvent) -> Result<Vec<Action>, AppError> {
        Ok(self.handle_key(key_event))
    }

    fn priority(&self) -> u8 {
        10
    }

    fn name(&self) -> &'static str {
        "NavigationHandler"
    }
}
