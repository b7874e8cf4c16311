use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
    controller::Action,
    model::{app_state::Screen, ui_state::UIOverlay},
};

/// Where a key press lands: the active screen and the topmost overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyContext {
    pub screen: Screen,
    pub overlay: UIOverlay,
}

impl KeyContext {
    #[must_use]
    pub const fn new(screen: Screen, overlay: UIOverlay) -> Self {
        Self { screen, overlay }
    }

    /// True when no overlay is capturing keys.
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        matches!(self.overlay, UIOverlay::None)
    }
}

/// Key handler trait for modular processing.
pub trait EventHandler: Send + Sync {
    /// Check if this handler can process the key in `ctx`.
    fn can_handle(&self, ctx: KeyContext, key: &KeyEvent) -> bool;

    /// Process the key and return actions.
    fn handle(&mut self, ctx: KeyContext, key: KeyEvent) -> Result<Vec<Action>, crate::error::AppError>;

    /// Handler priority for ordering (lower numbers run first).
    fn priority(&self) -> u8 {
        100
    }

    /// Handler name for debugging.
    fn name(&self) -> &'static str;
}

pub fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

pub fn arrow_key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn enter_key() -> KeyEvent {
    KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)
}

pub fn backspace_key() -> KeyEvent {
    KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE)
}

pub fn escape_key() -> KeyEvent {
    KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)
}

/// Key with its state/kind normalized so it can be used as a map key.
/// `?` and `G` arrive with SHIFT on some terminals and without on others.
#[must_use]
pub fn normalize(key: KeyEvent) -> KeyEvent {
    let modifiers = match key.code {
        KeyCode::Char(_) => key.modifiers - KeyModifiers::SHIFT,
        _ => key.modifiers,
    };
    KeyEvent::new(key.code, modifiers)
}
