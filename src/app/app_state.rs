//! Usage: Shared Tauri state for `commands/*` and the launcher initialization gate.
//!
//! The launcher core is built once, on first use: resolve the data dir, load the app list,
//! start the status poller and the change forwarder.

use super::desktop_ui::TauriUi;
use super::events;
use crate::desktop_host::DesktopHost;
use crate::launcher::Launcher;
use crate::notice::{self, NoticeLevel};
use crate::shared::mutex_ext::MutexExt;
use crate::status_poller::{self, StatusPollerHandle};
use crate::{app_paths, blocking, settings};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tauri::Manager;
use tokio::sync::OnceCell;

pub(crate) type AppHost = DesktopHost<TauriUi>;

pub(crate) struct LauncherCore {
    pub(crate) launcher: tokio::sync::Mutex<Launcher<AppHost>>,
    host: Arc<AppHost>,
    poller: Mutex<Option<StatusPollerHandle>>,
}

impl LauncherCore {
    pub(crate) fn request_status_refresh(&self) {
        if let Some(poller) = self.poller.lock_or_recover().as_ref() {
            poller.request_refresh();
        }
    }

    /// Starts a poller on the current list, stopping any previous one.
    pub(crate) async fn restart_poller(&self, app: &tauri::AppHandle, interval: Duration) {
        let apps = self.launcher.lock().await.store().subscribe();
        let handle = status_poller::start(
            self.host.clone(),
            apps,
            Arc::new(events::WebviewStatusSink::new(app.clone())),
            interval,
        );
        let previous = self.poller.lock_or_recover().replace(handle);
        if let Some(mut previous) = previous {
            previous.stop();
        }
        tracing::debug!(interval_ms = interval.as_millis() as u64, "status poller started");
    }

    pub(crate) fn take_poller(&self) -> Option<StatusPollerHandle> {
        self.poller.lock_or_recover().take()
    }
}

#[derive(Default)]
pub(crate) struct LauncherState(pub(crate) OnceCell<Result<Arc<LauncherCore>, String>>);

impl LauncherState {
    /// The core when it has already been initialized successfully.
    pub(crate) fn get(&self) -> Option<Arc<LauncherCore>> {
        self.0.get().and_then(|res| res.as_ref().ok().cloned())
    }
}

pub(crate) async fn ensure_launcher_ready(
    app: tauri::AppHandle,
    state: &LauncherState,
) -> Result<Arc<LauncherCore>, String> {
    state
        .0
        .get_or_init(|| async move { init_core(app).await })
        .await
        .clone()
}

async fn init_core(app: tauri::AppHandle) -> Result<Arc<LauncherCore>, String> {
    let data_dir = app_paths::app_data_dir(&app)?;
    let cfg = blocking::run("launcher_init_read_settings", {
        let data_dir = data_dir.clone();
        move || Ok(settings::read_or_default(&data_dir))
    })
    .await?;

    let version = app.package_info().version.to_string();
    let host = Arc::new(DesktopHost::new(
        data_dir,
        Arc::new(TauriUi::new(app.clone())),
        version,
    ));

    let mut launcher = Launcher::new(host.clone());
    if let Err(err) = launcher.store_mut().load().await {
        // Start with an empty list; the user can still add apps or reload.
        tracing::error!(error = %err, "app list load failed");
        let _ = notice::emit(
            &app,
            notice::build(
                NoticeLevel::Error,
                Some("App list".to_string()),
                format!("Could not load the app list: {err}"),
            ),
        );
    } else {
        tracing::info!(apps = launcher.store().len(), "app list loaded");
    }

    events::spawn_change_forwarder(app.clone(), launcher.store().subscribe());

    let core = Arc::new(LauncherCore {
        launcher: tokio::sync::Mutex::new(launcher),
        host,
        poller: Mutex::new(None),
    });
    core.restart_poller(&app, cfg.status_poll_interval()).await;
    Ok(core)
}
