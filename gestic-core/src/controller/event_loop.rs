//! ``src/controller/event_loop.rs``
//! ============================================================================
//! # Event Loop: Terminal Events and Task Results as Actions
//!
//! Merges three sources into one stream of [`Action`]s:
//! - crossterm's `EventStream` (keys, resizes), routed through the
//!   [`KeyHandlerOrchestrator`] for the active screen and overlay,
//! - results from background tasks,
//! - a periodic tick that drives the loading spinner and notification
//!   expiry.

use std::{sync::Arc, time::Duration};

use crossterm::event::{Event as TermEvent, EventStream, KeyEventKind};
use futures::StreamExt;
use tokio::{
    sync::mpsc,
    time::{Interval, MissedTickBehavior},
};
use tracing::{debug, info, trace};

use crate::{
    controller::{
        actions::Action,
        handlers::{KeyContext, key_handler_orchestrator::KeyHandlerOrchestrator},
    },
    error::AppError,
    fs::dir_node::DirNode,
    model::snapshot::{Snapshot, SnapshotPair},
};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Outcome of a background task.
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Snapshot listing finished.
    SnapshotsLoaded(Result<Vec<Snapshot>, AppError>),

    /// Both trees of a comparison were built, or the build failed.
    TreesLoaded {
        /// Which `start_compare` call this answers.
        generation: u64,
        pair: SnapshotPair,
        result: Result<(Arc<DirNode>, Arc<DirNode>), AppError>,
    },
}

pub struct EventLoop {
    task_rx: mpsc::UnboundedReceiver<TaskResult>,
    event_stream: EventStream,
    keys: KeyHandlerOrchestrator,
    tick: Interval,
}

impl EventLoop {
    pub fn new(task_rx: mpsc::UnboundedReceiver<TaskResult>) -> Self {
        info!("Initializing event loop");
        let mut tick = tokio::time::interval(TICK_INTERVAL);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self {
            task_rx,
            event_stream: EventStream::new(),
            keys: KeyHandlerOrchestrator::new(),
            tick,
        }
    }

    /// Wait for the next actions. `None` once every source is exhausted.
    pub async fn next_actions(&mut self, ctx: KeyContext) -> Option<Vec<Action>> {
        tokio::select! {
            Some(event) = self.event_stream.next() => match event {
                Ok(event) => Some(self.handle_terminal_event(ctx, event)),
                Err(e) => {
                    debug!(error = %e, "Terminal event stream error");
                    Some(Vec::new())
                }
            },

            Some(task_result) = self.task_rx.recv() => {
                debug!("Task result received: {:?}", task_result);
                Some(vec![Action::TaskResult(task_result)])
            }

            _ = self.tick.tick() => Some(vec![Action::Tick]),

            else => {
                info!("Event loop terminated - no more events");
                None
            }
        }
    }

    fn handle_terminal_event(&mut self, ctx: KeyContext, event: TermEvent) -> Vec<Action> {
        match event {
            TermEvent::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                trace!(
                    "Key event: code={:?}, modifiers={:?}",
                    key_event.code, key_event.modifiers
                );
                self.keys.handle_key_event(ctx, key_event)
            }

            TermEvent::Resize(w, h) => {
                debug!("Terminal resize: {}x{}", w, h);
                vec![Action::Resize(w, h)]
            }

            _ => Vec::new(),
        }
    }
}
