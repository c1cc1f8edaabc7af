//! Usage: Persisted launcher settings (schema + read/write helpers).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SCHEMA_VERSION: u32 = 1;
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const DEFAULT_STATUS_POLL_INTERVAL_MS: u64 = 2_000;
pub const MIN_STATUS_POLL_INTERVAL_MS: u64 = 500;
pub const MAX_STATUS_POLL_INTERVAL_MS: u64 = 60_000;
const DEFAULT_UPDATE_MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/personal-launcher/personal-launcher/main/version.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherSettings {
    pub schema_version: u32,
    // Set once the "still running in the tray" notice has been shown.
    pub hide_close_notification: bool,
    pub tray_enabled: bool,
    pub status_poll_interval_ms: u64,
    pub update_check_enabled: bool,
    pub update_manifest_url: String,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            hide_close_notification: false,
            tray_enabled: true,
            status_poll_interval_ms: DEFAULT_STATUS_POLL_INTERVAL_MS,
            update_check_enabled: true,
            update_manifest_url: DEFAULT_UPDATE_MANIFEST_URL.to_string(),
        }
    }
}

impl LauncherSettings {
    pub fn status_poll_interval(&self) -> Duration {
        Duration::from_millis(self.status_poll_interval_ms)
    }
}

fn sanitize_status_poll_interval(settings: &mut LauncherSettings) -> bool {
    let clamped = settings
        .status_poll_interval_ms
        .clamp(MIN_STATUS_POLL_INTERVAL_MS, MAX_STATUS_POLL_INTERVAL_MS);
    if clamped != settings.status_poll_interval_ms {
        settings.status_poll_interval_ms = clamped;
        return true;
    }
    false
}

fn sanitize_update_manifest_url(settings: &mut LauncherSettings) -> bool {
    let trimmed = settings.update_manifest_url.trim();
    if trimmed.is_empty() {
        settings.update_manifest_url = DEFAULT_UPDATE_MANIFEST_URL.to_string();
        return true;
    }
    if trimmed.len() != settings.update_manifest_url.len() {
        settings.update_manifest_url = trimmed.to_string();
        return true;
    }
    false
}

fn migrate_schema_version(settings: &mut LauncherSettings, schema_version_present: bool) -> bool {
    // If schema_version is missing, force a write so the file records the version it was read as.
    if schema_version_present && settings.schema_version >= SCHEMA_VERSION {
        return false;
    }
    settings.schema_version = SCHEMA_VERSION;
    true
}

pub fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SETTINGS_FILE_NAME)
}

fn parse_settings_json(content: &str) -> Result<(LauncherSettings, bool), String> {
    let raw: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| format!("SETTINGS: failed to parse settings.json: {e}"))?;
    let schema_version_present = raw.get("schema_version").is_some();
    let settings: LauncherSettings = serde_json::from_value(raw)
        .map_err(|e| format!("SETTINGS: failed to parse settings.json: {e}"))?;
    Ok((settings, schema_version_present))
}

pub fn read(data_dir: &Path) -> Result<LauncherSettings, String> {
    let path = settings_path(data_dir);

    let Some(content) = crate::shared::fs::read_optional_to_string(&path)
        .map_err(|e| format!("SETTINGS: {e}"))?
    else {
        let settings = LauncherSettings::default();
        // Best-effort: create default settings.json on first read to make the config discoverable/editable.
        let _ = write(data_dir, &settings);
        return Ok(settings);
    };

    let (mut settings, schema_version_present) = parse_settings_json(&content)?;

    let mut repaired = false;
    repaired |= migrate_schema_version(&mut settings, schema_version_present);
    repaired |= sanitize_status_poll_interval(&mut settings);
    repaired |= sanitize_update_manifest_url(&mut settings);
    if repaired {
        // Best-effort: persist repaired values while keeping read semantics.
        if let Err(err) = write(data_dir, &settings) {
            tracing::warn!(error = %err, "failed to persist repaired settings");
        }
    }

    Ok(settings)
}

pub fn write(data_dir: &Path, settings: &LauncherSettings) -> Result<LauncherSettings, String> {
    if settings.status_poll_interval_ms < MIN_STATUS_POLL_INTERVAL_MS
        || settings.status_poll_interval_ms > MAX_STATUS_POLL_INTERVAL_MS
    {
        return Err(format!(
            "SEC_INVALID_INPUT: status_poll_interval_ms must be between {MIN_STATUS_POLL_INTERVAL_MS} and {MAX_STATUS_POLL_INTERVAL_MS}"
        ));
    }
    if settings.update_manifest_url.trim().is_empty() {
        return Err("SEC_INVALID_INPUT: update_manifest_url is required".to_string());
    }

    let path = settings_path(data_dir);
    let backup_path = path.with_file_name(format!("{SETTINGS_FILE_NAME}.bak"));

    let content = serde_json::to_vec_pretty(settings)
        .map_err(|e| format!("SETTINGS: failed to serialize settings: {e}"))?;

    if backup_path.exists() {
        let _ = std::fs::remove_file(&backup_path);
    }
    if path.exists() {
        std::fs::copy(&path, &backup_path)
            .map_err(|e| format!("SETTINGS: failed to create settings backup: {e}"))?;
    }

    if let Err(e) = crate::shared::fs::write_file_atomic(&path, &content) {
        let _ = std::fs::rename(&backup_path, &path);
        return Err(format!("SETTINGS: failed to finalize settings: {e}"));
    }

    if backup_path.exists() {
        let _ = std::fs::remove_file(&backup_path);
    }

    Ok(settings.clone())
}

/// Settings as seen by startup code: unreadable files fall back to defaults.
pub fn read_or_default(data_dir: &Path) -> LauncherSettings {
    match read(data_dir) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(error = %err, "settings read failed, using defaults");
            LauncherSettings::default()
        }
    }
}
