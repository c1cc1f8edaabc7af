//! Usage: Best-effort cleanup before the process exits (stop the status poller).

use super::app_state::LauncherState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tauri::Manager;

static CLEANUP_STARTED: AtomicBool = AtomicBool::new(false);

const POLLER_STOP_TIMEOUT: Duration = Duration::from_secs(3);

pub(crate) async fn cleanup_before_exit(app: &tauri::AppHandle) {
    if CLEANUP_STARTED.swap(true, Ordering::SeqCst) {
        return;
    }

    let Some(core) = app.state::<LauncherState>().get() else {
        return;
    };
    let Some(mut poller) = core.take_poller() else {
        return;
    };

    poller.stop();
    if tokio::time::timeout(POLLER_STOP_TIMEOUT, poller.wait())
        .await
        .is_err()
    {
        tracing::warn!("exit cleanup: status poller did not stop in time");
    } else {
        tracing::info!("exit cleanup: status poller stopped");
    }
}
