//! src/util/clipboard.rs
//!
//! System clipboard access for path export. The handle is created on first
//! use and kept for the session: on X11 the owner must stay alive for other
//! applications to paste.

use crate::error::AppError;

/// Where exported paths are written.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), AppError>;
}

#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, AppError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| AppError::Clipboard("clipboard unavailable".into()))
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), AppError> {
        let result = self
            .handle()?
            .set_text(text)
            .map_err(|e| AppError::Clipboard(e.to_string()));

        if let Err(e) = &result {
            tracing::debug!("clipboard write failed: {}, dropping handle", e);
            self.inner = None;
        }
        result
    }
}

/// In-memory clipboard for tests.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    pub contents: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
    pub fail: bool,
}

#[cfg(test)]
impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Clipboard("no display".into()));
        }
        self.contents.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
