// gestic-core/src/controller/handlers/compare_handler.rs
// Drill-down and path export keys

use crate::controller::actions::Action;
use crate::error::AppError;
use crate::model::app_state::Screen;
use crossterm::event::{KeyCode, KeyEvent};
use std::collections::HashMap;

use super::*;

pub struct CompareHandler {
    bindings: HashMap<KeyEvent, Action>,
}

impl Default for CompareHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompareHandler {
    pub fn new() -> Self {
        let mut bindings = HashMap::with_capacity(9);

        bindings.insert(key('l'), Action::EnterSelected);
        bindings.insert(arrow_key(KeyCode::Right), Action::EnterSelected);
        bindings.insert(enter_key(), Action::EnterSelected);

        bindings.insert(key('h'), Action::GoToParent);
        bindings.insert(arrow_key(KeyCode::Left), Action::GoToParent);
        bindings.insert(backspace_key(), Action::GoToParent);

        bindings.insert(key('1'), Action::CopyField(1));
        bindings.insert(key('2'), Action::CopyField(2));
        bindings.insert(key('3'), Action::CopyField(3));

        Self { bindings }
    }
}

impl EventHandler for CompareHandler {
    fn can_handle(&self, ctx: KeyContext, key_event: &KeyEvent) -> bool {
        ctx.is_plain() && ctx.screen == Screen::Compare && self.bindings.contains_key(key_event)
    }

    fn handle(&mut self, _ctx: KeyContext, key_event: KeyEvent) -> Result<Vec<Action>, AppError> {
        Ok(self.bindings.get(&key_event).cloned().into_iter().collect())
    }

    fn priority(&self) -> u8 {
        20
    }

    fn name(&self) -> &'static str {
        "CompareHandler"
    }
}
