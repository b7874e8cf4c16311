//! src/logging.rs
//! ============================================================================
//! # Logging: File-Backed `tracing` Setup
//!
//! The TUI owns the terminal, so events go to a daily-rolling file
//! (`<log_dir>/gestic.YYYY-MM-DD`) through a non-blocking writer. `--list`
//! mode adds a stderr layer. `RUST_LOG` overrides the configured level.
//!
//! Lines use a compact sequence-numbered format:
//! `000042 INFO  [src/fs/tree_builder.rs:57 gestic_core::fs::tree_builder] ...`

use std::{
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

use anyhow::{Context, Result};
use tracing::Metadata;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, daily},
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    Layer,
};

const LOG_FILE_PREFIX: &str = "gestic";

static SEQ: AtomicUsize = AtomicUsize::new(1);

/// Builder for the global subscriber.
#[derive(Debug, Clone)]
pub struct Logger {
    log_dir: PathBuf,
    level: String,
    stderr: bool,
}

impl Logger {
    #[must_use]
    pub fn new(log_dir: PathBuf) -> Self {
        Self {
            log_dir,
            level: "info".to_string(),
            stderr: false,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: &str) -> Self {
        self.level = level.to_string();
        self
    }

    /// Mirror events to stderr. Only for modes that do not draw a TUI.
    #[must_use]
    pub const fn with_stderr(mut self, stderr: bool) -> Self {
        self.stderr = stderr;
        self
    }

    fn filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .with_context(|| format!("Invalid log level {:?}", self.level))
    }

    /// Install the global subscriber. Call **once** near the start of
    /// `main` and keep the guard alive until exit so buffered lines are
    /// flushed.
    pub fn init_tracing(self) -> Result<WorkerGuard> {
        std::fs::create_dir_all(&self.log_dir)
            .with_context(|| format!("cannot create log dir {}", self.log_dir.display()))?;

        let file: RollingFileAppender = daily(&self.log_dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(file);

        let file_layer = fmt::layer()
            .event_format(SeqFileMod)
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(self.filter()?);

        let stderr_layer = self.stderr.then(|| {
            fmt::layer()
                .event_format(SeqFileMod)
                .with_writer(std::io::stderr)
                .with_ansi(true)
        });

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer.map(|layer| layer.with_filter(EnvFilter::new("warn"))))
            .try_init()
            .context("Failed to install global tracing subscriber")?;

        Ok(guard)
    }
}

/// Restore the terminal, then log the panic, then run the default hook.
pub fn install_panic_hook(restore_terminal: fn()) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        tracing::error!(marker = "PANIC", panic = %info, "Application panicked");
        default_hook(info);
    }));
}

/// Custom formatter: `SEQ LEVEL [file:line mod::path] message fields`
struct SeqFileMod;

impl<S, N> FormatEvent<S, N> for SeqFileMod
where
    S: tracing::Subscriber + for<'lookup> LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let seq: usize = SEQ.fetch_add(1, Ordering::Relaxed);

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {:5} [{}:{} {}] ",
            meta.level(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
            meta.module_path().unwrap_or("???"),
        )?;

        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io,
        sync::{Arc, Mutex},
    };
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn lines_carry_sequence_level_and_fields() {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .event_format(SeqFileMod)
                .with_writer(buffer.clone())
                .with_ansi(false),
        );

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(marker = "TREE_BUILD", nodes = 3, "Snapshot tree built");
        });

        let out = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let line = out.lines().next().unwrap();
        assert!(line[..6].chars().all(|c| c.is_ascii_digit()), "{line}");
        assert!(line.contains("INFO"));
        assert!(line.contains("logging.rs"));
        assert!(line.contains("Snapshot tree built"));
        assert!(line.contains("nodes=3"));
    }

    #[test]
    fn bad_level_is_rejected() {
        let logger = Logger::new(PathBuf::from("logs")).with_level("gestic=verbose");
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(logger.filter().is_err());
        }
    }
}
