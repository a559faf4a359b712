//! Notification presenter background task

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use crate::{services::NotificationPresenter, state::Snapshot};

/// Feed every snapshot to `presenter` until the engine goes away.
///
/// Presenter failures are logged and skipped; the countdown is unaffected.
pub async fn presenter_task<P: NotificationPresenter>(
    mut snapshots: broadcast::Receiver<Snapshot>,
    presenter: P,
) {
    info!("Starting notification presenter task");

    loop {
        match snapshots.recv().await {
            Ok(snapshot) => {
                if let Err(e) = presenter.present(&snapshot).await {
                    warn!("Failed to present {:?} notification: {:#}", snapshot.kind, e);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Presenter fell behind, skipped {} snapshots", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Snapshot channel closed, presenter task exiting");
                break;
            }
        }
    }
}
