// gestic-core/src/controller/handlers/system_handler.rs
// Quit, help and cancel; active under every overlay

use crate::controller::actions::Action;
use crate::error::AppError;
use crate::model::ui_state::UIOverlay;
use crossterm::event::{KeyCode, KeyEvent};
use std::collections::HashMap;
use tracing::debug;

use super::*;

pub struct SystemHandler {
    bindings: HashMap<KeyEvent, Action>,
}

impl Default for SystemHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemHandler {
    pub fn new() -> Self {
        let mut bindings = HashMap::with_capacity(4);

        bindings.insert(key('q'), Action::Quit);
        bindings.insert(ctrl('c'), Action::Quit);
        bindings.insert(escape_key(), Action::Cancel);
        bindings.insert(key('?'), Action::ToggleHelp);

        Self { bindings }
    }
}

impl EventHandler for SystemHandler {
    fn can_handle(&self, ctx: KeyContext, key_event: &KeyEvent) -> bool {
        match ctx.overlay {
            // Enter also dismisses an error.
            UIOverlay::Error => {
                key_event.code == KeyCode::Enter || self.bindings.contains_key(key_event)
            }
            _ => self.bindings.contains_key(key_event),
        }
    }

    fn handle(&mut self, ctx: KeyContext, key_event: KeyEvent) -> Result<Vec<Action>, AppError> {
        let action = match (ctx.overlay, key_event.code) {
            (UIOverlay::Error, KeyCode::Enter) => Action::Cancel,
            (UIOverlay::Loading | UIOverlay::Error, KeyCode::Char('?')) => Action::NoOp,
            _ => self.bindings.get(&key_event).cloned().unwrap_or(Action::NoOp),
        };

        debug!(?ctx, ?action, "SystemHandler mapped key");
        Ok(vec![action])
    }

    fn priority(&self) -> u8 {
        0
    }

    fn name(&self) -> &'static str {
        "SystemHandler"
    }
}
