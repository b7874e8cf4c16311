//! ``src/restic/mod.rs``
//! ============================================================================
//! # Snapshot Lister
//!
//! [`ResticCli`] runs `restic snapshots`, parses the table and checks it
//! against the mounted repository. The UI depends only on the
//! [`SnapshotSource`] trait.

pub mod consistency;
pub mod parser;

use std::{
    future::Future,
    path::PathBuf,
    process::{Output, Stdio},
    time::{Duration, Instant},
};

use tokio::{process::Command, task as TokioScheduler};
use tracing::{info, instrument, warn};

use crate::{config::Config, error::AppError, model::snapshot::Snapshot};

/// Anything that can produce the oldest-first snapshot list.
pub trait SnapshotSource: Send + Sync {
    fn list_snapshots(&self) -> impl Future<Output = Result<Vec<Snapshot>, AppError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ResticCli {
    bin: PathBuf,
    repo: PathBuf,
    mount: PathBuf,
    password_file: Option<PathBuf>,
    timeout: Duration,
}

impl ResticCli {
    #[must_use]
    pub fn new(repo: PathBuf, mount: PathBuf) -> Self {
        Self {
            bin: PathBuf::from("restic"),
            repo,
            mount,
            password_file: None,
            timeout: Duration::from_secs(60),
        }
    }

    /// Build from the resolved configuration. Fails when `repo` or `mount`
    /// is not set.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let repo = config
            .repo
            .clone()
            .ok_or_else(|| AppError::snapshot_list("no repository configured (use --repo)"))?;
        let mount = config
            .mount
            .clone()
            .ok_or_else(|| AppError::snapshot_list("no mount point configured (use --mount)"))?;

        Ok(Self::new(repo, mount)
            .with_bin(config.restic_bin.clone())
            .with_password_file(config.password_file.clone())
            .with_timeout(config.list_timeout))
    }

    #[must_use]
    pub fn with_bin(mut self, bin: PathBuf) -> Self {
        self.bin = bin;
        self
    }

    #[must_use]
    pub fn with_password_file(mut self, password_file: Option<PathBuf>) -> Self {
        self.password_file = password_file;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("-r").arg(&self.repo);
        if let Some(file) = &self.password_file {
            cmd.arg("--password-file").arg(file);
        }
        cmd.arg("snapshots")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn command_line(&self) -> String {
        format!("{} -r {} snapshots", self.bin.display(), self.repo.display())
    }

    async fn run(&self) -> Result<String, AppError> {
        let output: Output = tokio::time::timeout(self.timeout, self.command().output())
            .await
            .map_err(|_| {
                AppError::snapshot_list(format!(
                    "restic did not answer within {}",
                    humantime::format_duration(self.timeout)
                ))
            })?
            .map_err(|e| AppError::snapshot_list(format!("cannot run {}: {e}", self.bin.display())))?;

        if !output.status.success() {
            return Err(AppError::ExternalCmd {
                cmd: self.command_line(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl SnapshotSource for ResticCli {
    #[instrument(
        skip(self),
        fields(
            operation_type = "snapshot_list",
            repo = %self.repo.display(),
            mount = %self.mount.display(),
        )
    )]
    async fn list_snapshots(&self) -> Result<Vec<Snapshot>, AppError> {
        let start = Instant::now();
        let stdout = self.run().await?;
        let listed = parser::parse_snapshot_table(&stdout)?;

        let mount = self.mount.clone();
        let snapshots = TokioScheduler::spawn_blocking(move || consistency::check_mount(listed, &mount))
            .await
            .map_err(|e| AppError::Other(format!("consistency check task failed: {e}")))?
            .inspect_err(|e| warn!(marker = "SNAPSHOT_LIST", error = %e, "Mount does not match listing"))?;

        info!(
            marker = "SNAPSHOT_LIST",
            operation_type = "snapshot_list_complete",
            count = snapshots.len(),
            duration_ms = start.elapsed().as_millis(),
            "Snapshots listed"
        );

        Ok(snapshots)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::{fs, os::unix::fs::PermissionsExt, path::Path};
    use tempfile::TempDir;

    fn fake_restic(dir: &Path, body: &str) -> PathBuf {
        let script = dir.join("restic");
        fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[tokio::test]
    async fn lists_and_matches_mounted_snapshots() {
        let tmp = TempDir::new().unwrap();
        let mount = tmp.path().join("mnt");
        fs::create_dir_all(mount.join("snapshots/2024-05-01T10:00:00+00:00")).unwrap();
        fs::create_dir_all(mount.join("snapshots/2024-05-08T10:00:05+00:00")).unwrap();

        let bin = fake_restic(
            tmp.path(),
            "cat <<'EOF'
ID        Time                 Host  Tags  Paths  Size
------------------------------------------------------
9c0d7e11  2024-05-08 10:00:05  nas         /srv   2.000 GiB
4f1e5b2a  2024-05-01 10:00:00  nas         /srv   1.500 GiB
------------------------------------------------------
2 snapshots
EOF",
        );

        let cli = ResticCli::new(tmp.path().join("repo"), mount.clone()).with_bin(bin);
        let snapshots = cli.list_snapshots().await.unwrap();

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].id, "4f1e5b2a");
        assert_eq!(snapshots[1].size_label, "2.000 GiB");
        assert_eq!(
            snapshots[1].mount_path,
            mount.join("snapshots/2024-05-08T10:00:05+00:00")
        );
    }

    #[tokio::test]
    async fn nonzero_exit_reports_stderr() {
        let tmp = TempDir::new().unwrap();
        let bin = fake_restic(tmp.path(), "echo 'Fatal: wrong password' >&2\nexit 1");

        let err = ResticCli::new(tmp.path().join("repo"), tmp.path().to_path_buf())
            .with_bin(bin)
            .list_snapshots()
            .await
            .unwrap_err();

        match err {
            AppError::ExternalCmd { code, stderr, .. } => {
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "Fatal: wrong password");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_binary_is_a_listing_error() {
        let tmp = TempDir::new().unwrap();
        let err = ResticCli::new(tmp.path().join("repo"), tmp.path().to_path_buf())
            .with_bin(tmp.path().join("no-such-restic"))
            .list_snapshots()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SnapshotList { .. }));
    }

    #[tokio::test]
    async fn slow_restic_times_out() {
        let tmp = TempDir::new().unwrap();
        let bin = fake_restic(tmp.path(), "sleep 5");

        let err = ResticCli::new(tmp.path().join("repo"), tmp.path().to_path_buf())
            .with_bin(bin)
            .with_timeout(Duration::from_millis(100))
            .list_snapshots()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("did not answer"));
    }
}
