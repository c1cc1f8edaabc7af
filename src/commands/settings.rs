//! Usage: Settings commands (read, validated write, apply to running state).

use crate::app_state::LauncherState;
use crate::resident::ResidentState;
use crate::settings::LauncherSettings;
use crate::{app_paths, blocking, settings};

#[tauri::command]
pub(crate) async fn settings_get(app: tauri::AppHandle) -> Result<LauncherSettings, String> {
    blocking::run("settings_get", move || {
        let data_dir = app_paths::app_data_dir(&app)?;
        settings::read(&data_dir)
    })
    .await
}

#[tauri::command]
pub(crate) async fn settings_set(
    app: tauri::AppHandle,
    state: tauri::State<'_, LauncherState>,
    resident: tauri::State<'_, ResidentState>,
    settings: LauncherSettings,
) -> Result<LauncherSettings, String> {
    let (previous, next) = blocking::run("settings_set", {
        let app = app.clone();
        move || {
            let data_dir = app_paths::app_data_dir(&app)?;
            let previous = settings::read_or_default(&data_dir);
            let next = settings::write(&data_dir, &settings)?;
            Ok((previous, next))
        }
    })
    .await?;

    resident.apply_settings(&next);
    if previous.status_poll_interval_ms != next.status_poll_interval_ms {
        if let Some(core) = state.get() {
            core.restart_poller(&app, next.status_poll_interval()).await;
        }
    }
    tracing::info!(
        tray_enabled = next.tray_enabled,
        status_poll_interval_ms = next.status_poll_interval_ms,
        "settings updated"
    );
    Ok(next)
}
