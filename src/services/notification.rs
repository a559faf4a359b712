//! Notification presenters

use std::future::Future;
use anyhow::{bail, Context};
use tokio::process::Command;
use tracing::{debug, info};

use crate::state::{Snapshot, SnapshotKind};

/// Renders timer snapshots as user-facing notifications.
///
/// Failures are returned to the caller, which logs them; they never reach
/// the engine.
pub trait NotificationPresenter: Send + Sync + 'static {
    fn present(&self, snapshot: &Snapshot) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Presents snapshots through the log
#[derive(Debug, Clone, Default)]
pub struct LogPresenter;

impl NotificationPresenter for LogPresenter {
    async fn present(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        match snapshot.kind {
            SnapshotKind::Tick => debug!(
                "{} {} ({}%)",
                snapshot.title, snapshot.remaining_text, snapshot.progress_percent
            ),
            SnapshotKind::PhaseComplete => info!(
                "ALERT {} {} [{}]",
                snapshot.title, snapshot.remaining_text, snapshot.toggle_label
            ),
            _ => info!(
                "{} {} [{}]",
                snapshot.title, snapshot.remaining_text, snapshot.toggle_label
            ),
        }
        Ok(())
    }
}

/// Posts notifications by running an external notifier such as `notify-send`.
///
/// The program is invoked as `<program> <title> <remaining>`. Per-second
/// ticks are not re-posted, only state changes and phase alerts.
#[derive(Debug, Clone)]
pub struct CommandPresenter {
    program: String,
    log: LogPresenter,
}

impl CommandPresenter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            log: LogPresenter,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Whether a snapshot warrants a new desktop notification
    pub fn should_post(snapshot: &Snapshot) -> bool {
        snapshot.kind != SnapshotKind::Tick
    }
}

impl NotificationPresenter for CommandPresenter {
    async fn present(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        self.log.present(snapshot).await?;

        if !Self::should_post(snapshot) {
            return Ok(());
        }

        let mut command = Command::new(&self.program);
        command.arg(&snapshot.title).arg(&snapshot.remaining_text);
        if snapshot.alert {
            command.args(["--urgency", "critical"]);
        }

        let output = command
            .output()
            .await
            .with_context(|| format!("failed to run notifier {}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("notifier {} failed: {}", self.program, stderr.trim());
        }

        debug!("Posted notification via {}", self.program);
        Ok(())
    }
}
