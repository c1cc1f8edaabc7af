//! Usage: Startup update check (manifest fetch, prompt, download into the downloads folder or
//! open the release page).

use crate::blocking;
use crate::settings::LauncherSettings;
use crate::update_check::{self, UpdateInfo};
use std::path::PathBuf;
use tauri::Manager;
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_opener::OpenerExt;

fn http_client(current_version: &str) -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .user_agent(format!("personal-launcher/{current_version}"))
        .build()
        .map_err(|e| format!("UPDATE_CHECK: failed to build http client: {e}"))
}

/// Failures are logged only; the user is never interrupted by a failed check.
pub(crate) async fn check_on_startup(app: tauri::AppHandle, cfg: LauncherSettings) {
    if !cfg.update_check_enabled {
        return;
    }

    let current = app.package_info().version.to_string();
    let client = match http_client(&current) {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(error = %err, "update check failed");
            return;
        }
    };
    let info = match update_check::check(&client, &cfg.update_manifest_url, &current).await {
        Ok(Some(info)) => info,
        Ok(None) => {
            tracing::debug!(current = %current, "no newer version published");
            return;
        }
        Err(err) => {
            tracing::warn!(error = %err, "update check failed");
            return;
        }
    };

    tracing::info!(current = %current, latest = %info.version, "update available");
    let mut body = format!(
        "Version {} is available (you have {current}).",
        info.version
    );
    if !info.changelog.trim().is_empty() {
        body.push_str("\n\n");
        body.push_str(info.changelog.trim());
    }

    if update_check::asset_file_name(&info.download_url).is_none() {
        body.push_str("\n\nOpen the download page?");
        if ask(&app, "Update available", body, "Open", "Later").await {
            open_release_page(&app, &info);
        }
        return;
    }

    body.push_str("\n\nDownload it now?");
    if !ask(&app, "Update available", body, "Download", "Later").await {
        return;
    }

    match download_update(&app, &client, &info).await {
        Ok(path) => {
            let body = format!("The new version was saved to:\n{}", path.display());
            if ask(&app, "Update downloaded", body, "Show in folder", "Close").await {
                if let Err(err) = app.opener().reveal_item_in_dir(&path) {
                    tracing::warn!(error = %err, path = %path.display(), "failed to reveal download");
                }
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "update download failed, opening release page");
            open_release_page(&app, &info);
        }
    }
}

async fn download_update(
    app: &tauri::AppHandle,
    client: &reqwest::Client,
    info: &UpdateInfo,
) -> Result<PathBuf, String> {
    let dest = app
        .path()
        .download_dir()
        .map_err(|e| format!("UPDATE_CHECK: downloads folder unavailable: {e}"))?;
    update_check::download(client, &info.download_url, &dest).await
}

fn open_release_page(app: &tauri::AppHandle, info: &UpdateInfo) {
    if info.release_url.is_empty() {
        return;
    }
    if let Err(err) = app.opener().open_url(info.release_url.as_str(), None::<&str>) {
        tracing::warn!(error = %err, url = %info.release_url, "failed to open release page");
    }
}

async fn ask(app: &tauri::AppHandle, title: &str, body: String, ok: &str, cancel: &str) -> bool {
    let title = title.to_string();
    let buttons = MessageDialogButtons::OkCancelCustom(ok.to_string(), cancel.to_string());
    let app = app.clone();
    blocking::run("update_prompt", move || {
        Ok(app
            .dialog()
            .message(body)
            .title(title)
            .kind(MessageDialogKind::Info)
            .buttons(buttons)
            .blocking_show())
    })
    .await
    .unwrap_or(false)
}
