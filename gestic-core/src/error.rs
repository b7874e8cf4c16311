//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for Snapshot Comparison
//!
//! This module defines the error enum used across the whole crate. Each
//! variant carries enough context to be shown to the operator as a single
//! message, and all library modules return `Result<T, AppError>`.

use std::{io, path::PathBuf, time::Duration};
use thiserror::Error;

/// Unified error type for tree building, snapshot listing and the UI.
#[derive(Debug, Error)]
pub enum AppError {
    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A directory could not be listed.
    #[error("Cannot read directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Error retrieving file or directory metadata.
    #[error("Filesystem metadata error on {path:?}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A tree walk did not finish in time.
    #[error("Scanning {path:?} timed out after {timeout:?}")]
    ScanTimeout { path: PathBuf, timeout: Duration },

    /// Operation cancelled by user or system.
    #[error("Operation was cancelled")]
    Cancelled,

    /// The snapshot listing could not be obtained or parsed.
    #[error("Snapshot listing failed: {reason}")]
    SnapshotList { reason: String },

    /// The mounted snapshot directories do not match the listing.
    #[error("Directory consistency error: {reason}")]
    Consistency { reason: String },

    /// External process failure (e.g., restic).
    #[error("External command failed: {cmd} (exit code: {code:?})\n{stderr}")]
    ExternalCmd {
        cmd: String,
        code: Option<i32>,
        stderr: String,
    },

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Config file I/O error with path.
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// System clipboard unavailable or rejected the write.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    /// Create a directory listing failure
    pub fn read_dir<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::ReadDir {
            path: path.into(),
            source,
        }
    }

    /// Create a metadata failure
    pub fn metadata<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::Metadata {
            path: path.into(),
            source,
        }
    }

    /// Create a snapshot listing failure
    pub fn snapshot_list<S: Into<String>>(reason: S) -> Self {
        Self::SnapshotList {
            reason: reason.into(),
        }
    }

    /// Create a mount consistency failure
    pub fn consistency<S: Into<String>>(reason: S) -> Self {
        Self::Consistency {
            reason: reason.into(),
        }
    }

    /// True for the kinds that abort a tree build: unreadable paths,
    /// permission problems, timeouts and cancellation.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::ReadDir { .. }
                | Self::Metadata { .. }
                | Self::ScanTimeout { .. }
                | Self::Cancelled
        )
    }
}

// Manual Clone implementation to handle non-Clone fields
impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            Self::Io(e) => Self::Io(io::Error::new(e.kind(), e.to_string())),
            Self::ReadDir { path, source } => Self::ReadDir {
                path: path.clone(),
                source: io::Error::new(source.kind(), source.to_string()),
            },
            Self::Metadata { path, source } => Self::Metadata {
                path: path.clone(),
                source: io::Error::new(source.kind(), source.to_string()),
            },
            Self::ScanTimeout { path, timeout } => Self::ScanTimeout {
                path: path.clone(),
                timeout: *timeout,
            },
            Self::Cancelled => Self::Cancelled,
            Self::SnapshotList { reason } => Self::SnapshotList {
                reason: reason.clone(),
            },
            Self::Consistency { reason } => Self::Consistency {
                reason: reason.clone(),
            },
            Self::ExternalCmd { cmd, code, stderr } => Self::ExternalCmd {
                cmd: cmd.clone(),
                code: *code,
                stderr: stderr.clone(),
            },
            Self::Config(e) => Self::Other(format!("Config error: {e}")),
            Self::ConfigIo { path, source } => Self::ConfigIo {
                path: path.clone(),
                source: io::Error::new(source.kind(), source.to_string()),
            },
            Self::Clipboard(msg) => Self::Clipboard(msg.clone()),
            Self::Other(msg) => Self::Other(msg.clone()),
        }
    }
}

// Allow conversion from `anyhow::Error` as fallback.
impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Other(e.to_string())
    }
}
