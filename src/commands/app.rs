//! Usage: App-level Tauri commands (about info, exit).

use crate::app_paths;
use tauri::Manager;

#[derive(Debug, Clone, serde::Serialize)]
pub(crate) struct AppAboutInfo {
    os: String,
    arch: String,
    profile: String,
    app_version: String,
    data_dir: Option<String>,
}

#[tauri::command]
pub(crate) fn app_about_get(app: tauri::AppHandle) -> AppAboutInfo {
    AppAboutInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        profile: if cfg!(debug_assertions) {
            "debug".to_string()
        } else {
            "release".to_string()
        },
        app_version: app.package_info().version.to_string(),
        data_dir: app_paths::app_data_dir(&app)
            .ok()
            .map(|dir| dir.display().to_string()),
    }
}

#[tauri::command]
pub(crate) fn app_exit(app: tauri::AppHandle) -> Result<bool, String> {
    std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(200));
        app.exit(0);
    });
    Ok(true)
}
