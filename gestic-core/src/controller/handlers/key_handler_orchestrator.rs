// gestic-core/src/controller/handlers/key_handler_orchestrator.rs
// Routes key events through chained handlers

use super::*;
use crate::controller::actions::Action;
use crossterm::event::KeyEvent;
use tracing::{debug, trace, warn};

use super::{
    compare_handler::CompareHandler, navigation_handler::NavigationHandler,
    selector_handler::SelectorHandler, system_handler::SystemHandler,
};

/// Tries each handler in priority order; the first one that produces
/// actions wins.
pub struct KeyHandlerOrchestrator {
    handlers: Vec<Box<dyn EventHandler>>,
    total_events_processed: u64,
    unhandled_events: u64,
}

impl std::fmt::Debug for KeyHandlerOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyHandlerOrchestrator")
            .field("handler_names", &self.handler_names())
            .field("total_events_processed", &self.total_events_processed)
            .field("unhandled_events", &self.unhandled_events)
            .finish()
    }
}

impl Default for KeyHandlerOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyHandlerOrchestrator {
    pub fn new() -> Self {
        let mut handlers: Vec<Box<dyn EventHandler>> = vec![
            Box::new(SystemHandler::new()),     // Priority 0
            Box::new(NavigationHandler::new()), // Priority 10
            Box::new(SelectorHandler::new()),   // Priority 20
            Box::new(CompareHandler::new()),    // Priority 20
        ];

        handlers.sort_by_key(|h| h.priority());

        debug!(
            handlers_count = handlers.len(),
            handler_names = ?handlers.iter().map(|h| h.name()).collect::<Vec<_>>(),
            "KeyHandlerOrchestrator initialized with handlers"
        );

        Self {
            handlers,
            total_events_processed: 0,
            unhandled_events: 0,
        }
    }

    fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Map a key press in `ctx` to actions. Unbound keys yield none.
    pub fn handle_key_event(&mut self, ctx: KeyContext, key_event: KeyEvent) -> Vec<Action> {
        self.total_events_processed += 1;
        let key_event = normalize(key_event);

        for handler in &mut self.handlers {
            if !handler.can_handle(ctx, &key_event) {
                continue;
            }
            match handler.handle(ctx, key_event) {
                Ok(actions) if !actions.is_empty() => {
                    trace!(
                        handler_name = handler.name(),
                        actions = ?actions,
                        "Handler processed key"
                    );
                    return actions;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(handler_name = handler.name(), error = %e, "Handler failed to process key");
                }
            }
        }

        self.unhandled_events += 1;
        trace!(?ctx, ?key_event, "No handler for key");
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{app_state::Screen, selector::Slot, ui_state::UIOverlay};
    use crossterm::event::{KeyCode, KeyModifiers};

    const SELECTOR: KeyContext = KeyContext::new(Screen::Selector, UIOverlay::None);
    const COMPARE: KeyContext = KeyContext::new(Screen::Compare, UIOverlay::None);

    fn one(o: &mut KeyHandlerOrchestrator, ctx: KeyContext, k: KeyEvent) -> Action {
        let mut actions = o.handle_key_event(ctx, k);
        assert_eq!(actions.len(), 1, "{actions:?}");
        actions.remove(0)
    }

    #[test]
    fn same_key_means_different_things_per_screen() {
        let mut o = KeyHandlerOrchestrator::new();

        assert!(matches!(one(&mut o, SELECTOR, enter_key()), Action::ConfirmSelection));
        assert!(matches!(one(&mut o, COMPARE, enter_key()), Action::EnterSelected));

        assert!(matches!(one(&mut o, SELECTOR, backspace_key()), Action::ClearSelection));
        assert!(matches!(one(&mut o, COMPARE, backspace_key()), Action::GoToParent));

        assert!(matches!(one(&mut o, SELECTOR, key('2')), Action::AssignSlot(Slot::Second)));
        assert!(matches!(one(&mut o, COMPARE, key('2')), Action::CopyField(2)));
        assert!(o.handle_key_event(SELECTOR, key('3')).is_empty());
    }

    #[test]
    fn cursor_keys_work_on_both_screens() {
        let mut o = KeyHandlerOrchestrator::new();
        for ctx in [SELECTOR, COMPARE] {
            assert!(matches!(one(&mut o, ctx, key('j')), Action::MoveSelectionDown));
            assert!(matches!(one(&mut o, ctx, arrow_key(KeyCode::Up)), Action::MoveSelectionUp));
            assert!(matches!(one(&mut o, ctx, arrow_key(KeyCode::End)), Action::SelectLast));
        }
    }

    #[test]
    fn gg_and_shifted_g() {
        let mut o = KeyHandlerOrchestrator::new();
        assert!(matches!(one(&mut o, COMPARE, key('g')), Action::NoOp));
        assert!(matches!(one(&mut o, COMPARE, key('g')), Action::SelectFirst));

        let shifted = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert!(matches!(one(&mut o, COMPARE, shifted), Action::SelectLast));
    }

    #[test]
    fn overlays_block_navigation_but_not_quit() {
        let mut o = KeyHandlerOrchestrator::new();
        let loading = KeyContext::new(Screen::Compare, UIOverlay::Loading);

        assert!(o.handle_key_event(loading, key('j')).is_empty());
        assert!(matches!(one(&mut o, loading, escape_key()), Action::Cancel));
        assert!(matches!(one(&mut o, loading, ctrl('c')), Action::Quit));

        let help = KeyContext::new(Screen::Selector, UIOverlay::Help);
        assert!(matches!(one(&mut o, help, key('?')), Action::ToggleHelp));

        let error = KeyContext::new(Screen::Selector, UIOverlay::Error);
        assert!(matches!(one(&mut o, error, enter_key()), Action::Cancel));
    }
}
