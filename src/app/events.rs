//! Usage: Push app list snapshots and status overlays to the webview.

use crate::apps::AppEntry;
use crate::status_poller::{ProcessStatus, StatusSink};
use tauri::Emitter;
use tokio::sync::watch;

pub(crate) const APPS_CHANGED_EVENT: &str = "apps:changed";
pub(crate) const APPS_STATUS_EVENT: &str = "apps:status";

pub(crate) struct WebviewStatusSink {
    app: tauri::AppHandle,
}

impl WebviewStatusSink {
    pub(crate) fn new(app: tauri::AppHandle) -> Self {
        Self { app }
    }
}

impl StatusSink for WebviewStatusSink {
    fn publish(&self, statuses: &[ProcessStatus]) {
        if let Err(err) = self.app.emit(APPS_STATUS_EVENT, statuses) {
            tracing::debug!(error = %err, "status event emit failed");
        }
    }
}

/// Emits `apps:changed` with the full list after every store publish. Ends with the store.
pub(crate) fn spawn_change_forwarder(app: tauri::AppHandle, mut apps: watch::Receiver<Vec<AppEntry>>) {
    tauri::async_runtime::spawn(async move {
        while apps.changed().await.is_ok() {
            let snapshot = apps.borrow_and_update().clone();
            if let Err(err) = app.emit(APPS_CHANGED_EVENT, &snapshot) {
                tracing::debug!(error = %err, "apps changed event emit failed");
            }
        }
    });
}
