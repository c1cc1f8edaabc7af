//! Usage: `launcher_apps.json` persistence (pretty JSON array of app records).

use crate::apps::{AppEntry, AppRecord};
use crate::shared::fs::{quarantine_file, read_optional_to_string, write_file_atomic};
use std::path::{Path, PathBuf};

pub const APPS_FILE_NAME: &str = "launcher_apps.json";

pub fn apps_path(data_dir: &Path) -> PathBuf {
    data_dir.join(APPS_FILE_NAME)
}

/// A missing file is an empty list. An unparsable file is moved aside and reported.
pub fn read(data_dir: &Path) -> Result<Vec<AppRecord>, String> {
    let path = apps_path(data_dir);
    let Some(content) = read_optional_to_string(&path).map_err(|e| format!("APPS_FILE: {e}"))?
    else {
        return Ok(Vec::new());
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Vec<AppRecord>>(&content) {
        Ok(records) => Ok(records),
        Err(parse_err) => {
            let moved = quarantine_file(&path).map_err(|e| format!("APPS_FILE: {e}"))?;
            tracing::error!(
                path = %path.display(),
                moved_to = %moved.display(),
                "app list file is corrupt: {}",
                parse_err
            );
            Err(format!(
                "APPS_FILE: failed to parse {APPS_FILE_NAME} (moved to {}): {parse_err}",
                moved.display()
            ))
        }
    }
}

pub fn write(data_dir: &Path, apps: &[AppEntry]) -> Result<(), String> {
    let content = serde_json::to_vec_pretty(apps)
        .map_err(|e| format!("APPS_FILE: failed to serialize app list: {e}"))?;
    write_file_atomic(&apps_path(data_dir), &content).map_err(|e| format!("APPS_FILE: {e}"))
}
