//! UI state: overlays, loading progress and notifications

use std::time::{Duration, Instant};

use compact_str::CompactString;
use tokio_util::sync::CancellationToken;

/// Overlay drawn over the active screen. Only the topmost one is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum UIOverlay {
    #[default]
    None = 0,
    Help = 1,
    Loading = 2,
    Error = 3,
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NotificationLevel {
    Info = 0,
    Success = 1,
    Warning = 2,
}

/// Status-bar message with timestamp
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: CompactString,
    pub level: NotificationLevel,
    pub timestamp: Instant,
    pub auto_dismiss: Duration,
}

/// A running background job the user is waiting on.
#[derive(Debug, Clone)]
pub struct LoadingState {
    pub message: CompactString,
    pub start_time: Instant,
    cancel: CancellationToken,
}

impl LoadingState {
    pub fn new(message: impl Into<CompactString>, cancel: CancellationToken) -> Self {
        Self {
            message: message.into(),
            start_time: Instant::now(),
            cancel,
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// An operation failed; the message is shown until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorState {
    pub title: CompactString,
    pub message: String,
    /// Nothing is left to show once this is dismissed, so dismissing quits.
    pub fatal: bool,
}

#[derive(Debug, Default)]
pub struct UIState {
    pub show_help: bool,
    pub loading: Option<LoadingState>,
    pub error: Option<ErrorState>,
    pub notification: Option<Notification>,
    pub frame_count: u64,
    redraw: bool,
}

impl UIState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }

    /// Topmost overlay: error, then loading, then help.
    #[must_use]
    pub const fn overlay(&self) -> UIOverlay {
        if self.error.is_some() {
            UIOverlay::Error
        } else if self.loading.is_some() {
            UIOverlay::Loading
        } else if self.show_help {
            UIOverlay::Help
        } else {
            UIOverlay::None
        }
    }

    pub const fn request_redraw(&mut self) {
        self.redraw = true;
    }

    #[must_use]
    pub const fn needs_redraw(&self) -> bool {
        self.redraw
    }

    pub const fn clear_redraw(&mut self) {
        self.redraw = false;
        self.frame_count += 1;
    }

    pub fn show_notification(&mut self, message: impl Into<CompactString>, level: NotificationLevel) {
        let auto_dismiss = match level {
            NotificationLevel::Info => Duration::from_secs(3),
            NotificationLevel::Success => Duration::from_secs(2),
            NotificationLevel::Warning => Duration::from_secs(5),
        };
        self.notification = Some(Notification {
            message: message.into(),
            level,
            timestamp: Instant::now(),
            auto_dismiss,
        });
        self.request_redraw();
    }

    #[inline]
    pub fn show_info(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Info);
    }

    #[inline]
    pub fn show_success(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Success);
    }

    #[inline]
    pub fn show_warning(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Warning);
    }

    pub fn show_error(&mut self, title: impl Into<CompactString>, message: impl Into<String>, fatal: bool) {
        self.error = Some(ErrorState {
            title: title.into(),
            message: message.into(),
            fatal,
        });
        self.request_redraw();
    }

    pub fn start_loading(&mut self, message: impl Into<CompactString>, cancel: CancellationToken) {
        self.loading = Some(LoadingState::new(message, cancel));
        self.request_redraw();
    }

    pub fn finish_loading(&mut self) -> Option<LoadingState> {
        self.request_redraw();
        self.loading.take()
    }

    /// Drop an expired notification. Returns whether one was removed.
    pub fn update_notification(&mut self) -> bool {
        if let Some(notification) = &self.notification
            && notification.timestamp.elapsed() > notification.auto_dismiss
        {
            self.notification = None;
            self.request_redraw();
            return true;
        }
        false
    }
}
