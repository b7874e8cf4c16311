// gestic-core/src/controller/handlers/selector_handler.rs
// Snapshot picking keys

use crate::controller::actions::Action;
use crate::error::AppError;
use crate::model::{app_state::Screen, selector::Slot};
use crossterm::event::KeyEvent;
use std::collections::HashMap;

use super::*;

pub struct SelectorHandler {
    bindings: HashMap<KeyEvent, Action>,
}

impl Default for SelectorHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorHandler {
    pub fn new() -> Self {
        let mut bindings = HashMap::with_capacity(5);

        bindings.insert(key('1'), Action::AssignSlot(Slot::First));
        bindings.insert(key('2'), Action::AssignSlot(Slot::Second));
        bindings.insert(key(' '), Action::SelectSnapshot);
        bindings.insert(backspace_key(), Action::ClearSelection);
        bindings.insert(enter_key(), Action::ConfirmSelection);

        Self { bindings }
    }
}

impl EventHandler for SelectorHandler {
    fn can_handle(&self, ctx: KeyContext, key_event: &KeyEvent) -> bool {
        ctx.is_plain() && ctx.screen == Screen::Selector && self.bindings.contains_key(key_event)
    }

    fn handle(&mut self, _ctx: KeyContext, key_event: KeyEvent) -> Result<Vec<Action>, AppError> {
        Ok(self.bindings.get(&key_event).cloned().into_iter().collect())
    }

    fn priority(&self) -> u8 {
        20
    }

    fn name(&self) -> &'static str {
        "SelectorHandler"
    }
}
