//! Usage: Resolve the per-user launcher data directory (`~/.personal-launcher`).

use std::path::{Path, PathBuf};

pub const APP_DOTDIR_NAME: &str = ".personal-launcher";
const APP_DOTDIR_NAME_ENV: &str = "PERSONAL_LAUNCHER_DOTDIR_NAME";
const LOGS_DIR_NAME: &str = "logs";

fn is_safe_dotdir_name(name: &str) -> bool {
    if name == "." || name == ".." || !name.starts_with('.') {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
}

fn dotdir_name(env_value: Option<String>) -> String {
    env_value
        .map(|v| v.trim().to_string())
        .filter(|v| is_safe_dotdir_name(v))
        .unwrap_or_else(|| APP_DOTDIR_NAME.to_string())
}

pub fn data_dir_under(home_dir: &Path) -> Result<PathBuf, String> {
    let dir = home_dir.join(dotdir_name(std::env::var(APP_DOTDIR_NAME_ENV).ok()));
    std::fs::create_dir_all(&dir).map_err(|e| format!("failed to create app dir: {e}"))?;
    Ok(dir)
}

pub fn logs_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(LOGS_DIR_NAME)
}

#[cfg(feature = "desktop")]
pub fn app_data_dir(app: &tauri::AppHandle) -> Result<PathBuf, String> {
    use tauri::Manager;

    let home_dir = app
        .path()
        .home_dir()
        .map_err(|e| format!("failed to resolve home dir: {e}"))?;
    data_dir_under(&home_dir)
}
