//! ``src/controller/action_dispatcher.rs``
//! ============================================================================
//! # Action Dispatcher: Applies Actions to `AppState`
//!
//! The only place that mutates [`AppState`]. Navigation itself is delegated
//! to [`NavigationController`](crate::model::navigation::NavigationController)
//! and [`SelectorState`]; this module decides which of them an action goes
//! to, starts background jobs, and turns their results into screens,
//! overlays and notifications.

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    controller::{actions::Action, event_loop::TaskResult},
    error::AppError,
    model::{
        app_state::{AppState, Screen},
        navigation::NavCommand,
        selector::SelectorState,
        snapshot::SnapshotPair,
        ui_state::UIOverlay,
    },
    restic::SnapshotSource,
    tasks::{compare_task::spawn_compare_task, snapshot_task::spawn_snapshot_task},
    util::clipboard::ClipboardSink,
};

/// Whether the main loop keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    Continue,
    Quit,
}

pub struct ActionDispatcher<C: ClipboardSink> {
    task_tx: UnboundedSender<TaskResult>,
    scan_timeout: Duration,
    page_size: usize,
    clipboard: C,
    /// Generation of the build the loading overlay waits on; results
    /// carrying any other generation are stale.
    pending: Option<u64>,
    next_generation: u64,
}

impl<C: ClipboardSink> ActionDispatcher<C> {
    pub fn new(
        task_tx: UnboundedSender<TaskResult>,
        scan_timeout: Duration,
        page_size: u16,
        clipboard: C,
    ) -> Self {
        Self {
            task_tx,
            scan_timeout,
            page_size: usize::from(page_size.max(1)),
            clipboard,
            pending: None,
            next_generation: 0,
        }
    }

    /// List snapshots in the background behind the loading overlay.
    pub fn start_listing<S>(&self, app: &mut AppState, source: Arc<S>)
    where
        S: SnapshotSource + 'static,
    {
        app.ui.start_loading("Listing snapshots", CancellationToken::new());
        spawn_snapshot_task(source, self.task_tx.clone());
    }

    /// Build both trees of `pair` in the background behind the loading
    /// overlay. `esc` cancels through the overlay's token.
    #[instrument(level = "info", skip(self, app), fields(newer = %pair.newer_id, older = %pair.older_id))]
    pub fn start_compare(&mut self, app: &mut AppState, pair: SnapshotPair) {
        let cancel = CancellationToken::new();
        app.ui.start_loading(
            format!("Scanning {} and {}", pair.newer_id, pair.older_id),
            cancel.clone(),
        );
        self.next_generation += 1;
        let generation = self.next_generation;
        self.pending = Some(generation);
        debug!(generation, "Tree build started");
        spawn_compare_task(generation, pair, self.scan_timeout, cancel, self.task_tx.clone());
    }

    pub fn dispatch(&mut self, app: &mut AppState, action: Action) -> DispatchResult {
        match action {
            Action::Quit => {
                if let Some(loading) = app.ui.finish_loading() {
                    loading.cancel();
                }
                return DispatchResult::Quit;
            }

            Action::Cancel => return self.cancel(app),

            Action::Tick => {
                app.ui.update_notification();
                if app.ui.loading.is_some() {
                    app.ui.request_redraw();
                }
            }

            Action::Resize(width, height) => {
                app.viewport = (width, height);
                if let Some(session) = app.compare.as_mut() {
                    session.nav.apply(NavCommand::Resize { width, height });
                }
                app.ui.request_redraw();
            }

            Action::ToggleHelp => {
                app.ui.show_help = !app.ui.show_help;
                app.ui.request_redraw();
            }

            Action::MoveSelectionUp => self.navigate(app, NavCommand::MoveCursor(-1)),
            Action::MoveSelectionDown => self.navigate(app, NavCommand::MoveCursor(1)),
            Action::PageUp => self.navigate(app, NavCommand::PageUp),
            Action::PageDown => self.navigate(app, NavCommand::PageDown),
            Action::SelectFirst => self.navigate(app, NavCommand::First),
            Action::SelectLast => self.navigate(app, NavCommand::Last),
            Action::EnterSelected => self.navigate(app, NavCommand::Enter),
            Action::GoToParent => self.navigate(app, NavCommand::Leave),

            Action::CopyField(field) => self.copy_field(app, field),

            Action::AssignSlot(slot) => {
                app.selector.assign(slot);
                app.ui.request_redraw();
            }
            Action::SelectSnapshot => {
                app.selector.select();
                app.ui.request_redraw();
            }
            Action::ClearSelection => {
                app.selector.clear();
                app.ui.request_redraw();
            }
            Action::ConfirmSelection => match app.selector.confirm() {
                Some(pair) => self.start_compare(app, pair),
                None => app.ui.show_info("Select two snapshots first"),
            },

            Action::TaskResult(result) => self.task_result(app, result),

            Action::NoOp => {}
        }

        DispatchResult::Continue
    }

    fn cancel(&mut self, app: &mut AppState) -> DispatchResult {
        match app.ui.overlay() {
            UIOverlay::Error => {
                let fatal = app.ui.error.take().is_some_and(|e| e.fatal);
                app.ui.request_redraw();
                if fatal {
                    return DispatchResult::Quit;
                }
            }
            UIOverlay::Loading => {
                if let Some(loading) = app.ui.finish_loading() {
                    loading.cancel();
                    info!(marker = "COMPARE_CANCELLED", "Loading cancelled by user");
                }
                self.pending = None;
                if app.direct_mode || app.selector.is_empty() {
                    return DispatchResult::Quit;
                }
                app.ui.show_info("Cancelled");
            }
            UIOverlay::Help => {
                app.ui.show_help = false;
                app.ui.request_redraw();
            }
            UIOverlay::None => {
                if app.screen == Screen::Compare {
                    if app.direct_mode {
                        return DispatchResult::Quit;
                    }
                    app.close_compare();
                }
            }
        }
        DispatchResult::Continue
    }

    fn navigate(&mut self, app: &mut AppState, cmd: NavCommand) {
        let changed = match app.screen {
            Screen::Selector => navigate_selector(&mut app.selector, cmd, self.page_size),
            Screen::Compare => app
                .compare
                .as_mut()
                .is_some_and(|session| session.nav.apply(cmd)),
        };

        if changed {
            app.ui.request_redraw();
        }
    }

    fn copy_field(&mut self, app: &mut AppState, field: usize) {
        let Some(exported) = app.compare.as_ref().and_then(|s| s.nav.export_selected()) else {
            return;
        };
        let Some(text) = exported.field(field) else {
            app.ui.show_info(format!("Nothing to copy for [{field}]"));
            return;
        };

        match self.clipboard.set_text(text) {
            Ok(()) => {
                debug!(field, text, "Copied to clipboard");
                app.ui.show_success(format!("Copied [{field}] {text}"));
            }
            Err(e) => {
                warn!(error = %e, "Clipboard write failed");
                app.ui.show_warning(e.to_string());
            }
        }
    }

    fn task_result(&mut self, app: &mut AppState, result: TaskResult) {
        match result {
            TaskResult::SnapshotsLoaded(Ok(snapshots)) => {
                app.ui.finish_loading();
                if snapshots.is_empty() {
                    app.ui.show_error("No snapshots", "The repository has no snapshots.", true);
                    return;
                }
                info!(count = snapshots.len(), "Snapshot selector ready");
                app.selector = SelectorState::new(snapshots);
            }
            TaskResult::SnapshotsLoaded(Err(e)) => {
                app.ui.finish_loading();
                app.ui.show_error("Snapshot listing failed", e.to_string(), true);
            }

            TaskResult::TreesLoaded { generation, pair, result } => {
                if self.pending != Some(generation) {
                    debug!(generation, newer = %pair.newer_id, "Discarding stale tree build result");
                    return;
                }
                self.pending = None;
                app.ui.finish_loading();

                match result {
                    Ok((newer, older)) => app.open_compare(pair, newer, older),
                    Err(AppError::Cancelled) => app.ui.show_info("Cancelled"),
                    Err(e) => app.ui.show_error("Comparison failed", e.to_string(), app.direct_mode),
                }
            }
        }
    }
}

fn navigate_selector(selector: &mut SelectorState, cmd: NavCommand, page: usize) -> bool {
    let before = selector.cursor();
    let page = isize::try_from(page).unwrap_or(isize::MAX);
    match cmd {
        NavCommand::MoveCursor(delta) => selector.move_cursor(delta),
        NavCommand::PageUp => selector.move_cursor(-page),
        NavCommand::PageDown => selector.move_cursor(page),
        NavCommand::First => selector.set_cursor(0),
        NavCommand::Last => selector.set_cursor(usize::MAX),
        NavCommand::Enter | NavCommand::Leave | NavCommand::Resize { .. } => {}
    }
    selector.cursor() != before
}
