//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver
//!
//! Settings are stored as TOML in the platform config directory found with
//! the [`directories`](https://docs.rs/directories) crate
//! (`$XDG_CONFIG_HOME/gestic/config.toml` on Linux). A missing file is
//! created with defaults on first run. Command-line flags override file
//! values through [`ConfigOverrides`].
//!
//! ## Example
//! ```rust,ignore
//! let mut config = Config::load().await;
//! config.apply(overrides);
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs as TokioFs;
use tracing::{info, warn};

use crate::error::AppError;

/// Main configuration struct for the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// restic repository passed as `-r`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<PathBuf>,

    /// Directory where `restic mount` exposes the repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount: Option<PathBuf>,

    pub restic_bin: PathBuf,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_file: Option<PathBuf>,

    /// Upper bound for building one snapshot tree.
    #[serde(with = "humantime_serde")]
    pub scan_timeout: Duration,

    /// Upper bound for `restic snapshots`.
    #[serde(with = "humantime_serde")]
    pub list_timeout: Duration,

    /// Default filter directive; `RUST_LOG` wins when set.
    pub log_level: String,

    /// Log directory. Defaults to the platform data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Rows moved by PageUp/PageDown before the first resize is known.
    pub page_size: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo: None,
            mount: None,
            restic_bin: PathBuf::from("restic"),
            password_file: None,
            scan_timeout: Duration::from_secs(600), // 10 minutes
            list_timeout: Duration::from_secs(60),
            log_level: "info".to_string(),
            log_dir: None,
            page_size: 10,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub repo: Option<PathBuf>,
    pub mount: Option<PathBuf>,
    pub restic_bin: Option<PathBuf>,
    pub password_file: Option<PathBuf>,
    pub scan_timeout: Option<Duration>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load from the platform config path, creating it with defaults when
    /// missing. An unreadable or invalid file is logged and defaults are
    /// used.
    pub async fn load() -> Self {
        let loaded = match Self::config_path() {
            Ok(path) => Self::load_from(&path).await,
            Err(e) => Err(e),
        };

        loaded.unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default configuration");
            Self::default()
        })
    }

    /// Load from `path`, writing defaults there if it does not exist.
    pub async fn load_from(path: &Path) -> Result<Self, AppError> {
        if TokioFs::try_exists(path).await.unwrap_or(false) {
            info!("Loading config from {}", path.display());
            let text = TokioFs::read_to_string(path)
                .await
                .map_err(|source| AppError::ConfigIo {
                    path: path.to_path_buf(),
                    source,
                })?;

            Ok(toml::from_str(&text)?)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to(path).await?;

            Ok(default_config)
        }
    }

    /// Save to `path`, creating parent directories.
    pub async fn save_to(&self, path: &Path) -> Result<(), AppError> {
        let io_err = |source| AppError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| AppError::Other(format!("cannot serialize config: {e}")))?;
        TokioFs::write(path, toml_str).await.map_err(io_err)?;

        Ok(())
    }

    /// Layer command-line values over file values.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides {
            repo,
            mount,
            restic_bin,
            password_file,
            scan_timeout,
            log_level,
        } = overrides;

        if repo.is_some() {
            self.repo = repo;
        }
        if mount.is_some() {
            self.mount = mount;
        }
        if let Some(bin) = restic_bin {
            self.restic_bin = bin;
        }
        if password_file.is_some() {
            self.password_file = password_file;
        }
        if let Some(timeout) = scan_timeout {
            self.scan_timeout = timeout;
        }
        if let Some(level) = log_level {
            self.log_level = level;
        }
    }

    fn project_dirs() -> Result<ProjectDirs, AppError> {
        ProjectDirs::from("", "", "gestic")
            .ok_or_else(|| AppError::Other("Could not determine config directory.".into()))
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> Result<PathBuf, AppError> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory for log files: the configured one, else the platform data
    /// dir, else `./logs`.
    #[must_use]
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            Self::project_dirs().map_or_else(
                |_| PathBuf::from("logs"),
                |dirs| dirs.data_local_dir().join("logs"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_is_created_with_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/config.toml");

        let cfg = Config::load_from(&path).await.unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let reloaded = Config::load_from(&path).await.unwrap();
        assert_eq!(reloaded, cfg);
    }

    #[tokio::test]
    async fn partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        tokio::fs::write(
            &path,
            "repo = \"/srv/restic\"\nmount = \"/mnt/restic\"\nscan_timeout = \"2m 30s\"\n",
        )
        .await
        .unwrap();

        let cfg = Config::load_from(&path).await.unwrap();
        assert_eq!(cfg.repo.as_deref(), Some(Path::new("/srv/restic")));
        assert_eq!(cfg.mount.as_deref(), Some(Path::new("/mnt/restic")));
        assert_eq!(cfg.scan_timeout, Duration::from_secs(150));
        assert_eq!(cfg.list_timeout, Duration::from_secs(60));
        assert_eq!(cfg.restic_bin, PathBuf::from("restic"));
    }

    #[tokio::test]
    async fn invalid_toml_is_a_config_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        tokio::fs::write(&path, "scan_timeout = [").await.unwrap();

        let err = Config::load_from(&path).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut cfg = Config {
            repo: Some(PathBuf::from("/from/file")),
            mount: Some(PathBuf::from("/mnt/file")),
            ..Config::default()
        };

        cfg.apply(ConfigOverrides {
            repo: Some(PathBuf::from("/from/cli")),
            scan_timeout: Some(Duration::from_secs(5)),
            ..ConfigOverrides::default()
        });

        assert_eq!(cfg.repo, Some(PathBuf::from("/from/cli")));
        assert_eq!(cfg.mount, Some(PathBuf::from("/mnt/file")));
        assert_eq!(cfg.scan_timeout, Duration::from_secs(5));
        assert_eq!(cfg.log_level, "info");
    }
}
