//! Usage: App list commands (list edits, bulk start/stop, restart, status refresh, window size).
//!
//! Store errors are returned to the webview. Process actions report through `notice:notify`.

use crate::app_state::{ensure_launcher_ready, LauncherState};
use crate::apps::AppEntry;
use crate::launcher::AppDraft;
use crate::notice::{self, NoticeEventPayload};

fn emit_notice(app: &tauri::AppHandle, payload: Option<NoticeEventPayload>) {
    let Some(payload) = payload else {
        return;
    };
    if let Err(err) = notice::emit(app, payload) {
        tracing::warn!(error = %err, "notice emit failed");
    }
}

#[tauri::command]
pub(crate) async fn apps_list(
    app: tauri::AppHandle,
    state: tauri::State<'_, LauncherState>,
) -> Result<Vec<AppEntry>, String> {
    let core = ensure_launcher_ready(app, state.inner()).await?;
    let launcher = core.launcher.lock().await;
    Ok(launcher.store().entries().to_vec())
}

#[tauri::command]
pub(crate) async fn apps_reload(
    app: tauri::AppHandle,
    state: tauri::State<'_, LauncherState>,
) -> Result<Vec<AppEntry>, String> {
    let core = ensure_launcher_ready(app, state.inner()).await?;
    let mut launcher = core.launcher.lock().await;
    let entries = launcher.store_mut().load().await?.to_vec();
    Ok(entries)
}

#[tauri::command]
pub(crate) async fn app_add_pick(
    app: tauri::AppHandle,
    state: tauri::State<'_, LauncherState>,
) -> Result<Option<AppDraft>, String> {
    let core = ensure_launcher_ready(app, state.inner()).await?;
    let launcher = core.launcher.lock().await;
    launcher.pick_new_app().await
}

#[tauri::command]
pub(crate) async fn app_add_confirm(
    app: tauri::AppHandle,
    state: tauri::State<'_, LauncherState>,
    path: String,
    name: String,
) -> Result<Option<AppEntry>, String> {
    let core = ensure_launcher_ready(app, state.inner()).await?;
    let mut launcher = core.launcher.lock().await;
    launcher.confirm_new_app(path, name).await
}

#[tauri::command]
pub(crate) async fn app_delete(
    app: tauri::AppHandle,
    state: tauri::State<'_, LauncherState>,
    index: usize,
) -> Result<AppEntry, String> {
    let core = ensure_launcher_ready(app, state.inner()).await?;
    let mut launcher = core.launcher.lock().await;
    let removed = launcher.store_mut().delete(index).await?;
    tracing::info!(name = %removed.name, "app deleted");
    Ok(removed)
}

#[tauri::command]
pub(crate) async fn app_move_up(
    app: tauri::AppHandle,
    state: tauri::State<'_, LauncherState>,
    index: usize,
) -> Result<bool, String> {
    let core = ensure_launcher_ready(app, state.inner()).await?;
    let mut launcher = core.launcher.lock().await;
    launcher.store_mut().move_up(index).await
}

#[tauri::command]
pub(crate) async fn app_move_down(
    app: tauri::AppHandle,
    state: tauri::State<'_, LauncherState>,
    index: usize,
) -> Result<bool, String> {
    let core = ensure_launcher_ready(app, state.inner()).await?;
    let mut launcher = core.launcher.lock().await;
    launcher.store_mut().move_down(index).await
}

#[tauri::command]
pub(crate) async fn app_toggle_checked(
    app: tauri::AppHandle,
    state: tauri::State<'_, LauncherState>,
    index: usize,
) -> Result<bool, String> {
    let core = ensure_launcher_ready(app, state.inner()).await?;
    let mut launcher = core.launcher.lock().await;
    launcher.store_mut().toggle_checked(index).await
}

#[tauri::command]
pub(crate) async fn app_rename(
    app: tauri::AppHandle,
    state: tauri::State<'_, LauncherState>,
    index: usize,
    name: String,
) -> Result<bool, String> {
    let core = ensure_launcher_ready(app, state.inner()).await?;
    let mut launcher = core.launcher.lock().await;
    launcher.rename(index, name).await
}

#[tauri::command]
pub(crate) async fn app_change_path(
    app: tauri::AppHandle,
    state: tauri::State<'_, LauncherState>,
    index: usize,
) -> Result<bool, String> {
    let core = ensure_launcher_ready(app, state.inner()).await?;
    let mut launcher = core.launcher.lock().await;
    launcher.change_path(index).await
}

#[tauri::command]
pub(crate) async fn apps_start_selected(
    app: tauri::AppHandle,
    state: tauri::State<'_, LauncherState>,
) -> Result<(), String> {
    let core = ensure_launcher_ready(app.clone(), state.inner()).await?;
    let notice = core.launcher.lock().await.start_selected().await;
    core.request_status_refresh();
    emit_notice(&app, notice);
    Ok(())
}

#[tauri::command]
pub(crate) async fn apps_stop_selected(
    app: tauri::AppHandle,
    state: tauri::State<'_, LauncherState>,
) -> Result<(), String> {
    let core = ensure_launcher_ready(app.clone(), state.inner()).await?;
    let notice = core.launcher.lock().await.stop_selected().await;
    core.request_status_refresh();
    emit_notice(&app, Some(notice));
    Ok(())
}

#[tauri::command]
pub(crate) async fn app_restart(
    app: tauri::AppHandle,
    state: tauri::State<'_, LauncherState>,
    index: usize,
) -> Result<(), String> {
    let core = ensure_launcher_ready(app.clone(), state.inner()).await?;
    let notice = core.launcher.lock().await.restart(index).await;
    core.request_status_refresh();
    emit_notice(&app, notice);
    Ok(())
}

#[tauri::command]
pub(crate) async fn apps_status_refresh(
    app: tauri::AppHandle,
    state: tauri::State<'_, LauncherState>,
) -> Result<(), String> {
    let core = ensure_launcher_ready(app, state.inner()).await?;
    core.request_status_refresh();
    Ok(())
}

#[tauri::command]
pub(crate) async fn window_resize(
    app: tauri::AppHandle,
    state: tauri::State<'_, LauncherState>,
    width: u32,
    height: u32,
) -> Result<(), String> {
    let core = ensure_launcher_ready(app, state.inner()).await?;
    let launcher = core.launcher.lock().await;
    launcher.resize_window(width, height).await;
    Ok(())
}
