//! Usage: Configured applications (record schema + ordered store mirrored to the host).

use crate::host::LauncherHost;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

const FALLBACK_DISPLAY_NAME: &str = "App";

/// Persisted shape as returned by the host. Older files may omit the boolean flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub checked: Option<bool>,
    #[serde(default)]
    pub admin_required: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppEntry {
    pub name: String,
    pub path: String,
    pub icon: Option<String>,
    pub checked: bool,
    pub admin_required: bool,
}

impl AppEntry {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            icon: None,
            checked: true,
            admin_required: false,
        }
    }

    pub fn from_record(record: AppRecord) -> Self {
        Self {
            name: record.name,
            path: record.path,
            icon: record.icon,
            checked: record.checked.unwrap_or(true),
            admin_required: record.admin_required.unwrap_or(false),
        }
    }

    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            FALLBACK_DISPLAY_NAME
        } else {
            trimmed
        }
    }
}

impl From<AppEntry> for AppRecord {
    fn from(entry: AppEntry) -> Self {
        Self {
            name: entry.name,
            path: entry.path,
            icon: entry.icon,
            checked: Some(entry.checked),
            admin_required: Some(entry.admin_required),
        }
    }
}

/// Last path component, accepting both `/` and `\` separators.
pub fn file_name_of(path: &str) -> Option<&str> {
    path.rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Name proposed when adding an executable: its file name without a trailing `.exe`.
pub fn default_name_for_path(path: &str) -> String {
    let Some(file_name) = file_name_of(path) else {
        return String::new();
    };
    let lowered = file_name.to_ascii_lowercase();
    match lowered.strip_suffix(".exe") {
        Some(stem) if !stem.is_empty() => file_name[..stem.len()].to_string(),
        _ => file_name.to_string(),
    }
}

fn out_of_range(index: usize, len: usize) -> String {
    format!("SEC_INVALID_INPUT: app index out of range: {index} (len={len})")
}

/// Ordered list of entries, the single source of truth for rendering.
///
/// Every mutation is applied locally, published to subscribers and then saved to the host as a
/// full list. When the save fails the previous list is restored and republished.
pub struct AppListStore<H> {
    host: Arc<H>,
    entries: Vec<AppEntry>,
    snapshots: watch::Sender<Vec<AppEntry>>,
}

impl<H: LauncherHost> AppListStore<H> {
    pub fn new(host: Arc<H>) -> Self {
        let (snapshots, _) = watch::channel(Vec::new());
        Self {
            host,
            entries: Vec::new(),
            snapshots,
        }
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// Receives a copy of the list after every load and every applied mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<AppEntry>> {
        self.snapshots.subscribe()
    }

    pub fn entries(&self) -> &[AppEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AppEntry> {
        self.entries.get(index)
    }

    pub async fn load(&mut self) -> Result<&[AppEntry], String> {
        let records = self.host.get_apps().await?;
        self.entries = records.into_iter().map(AppEntry::from_record).collect();
        self.publish();
        tracing::debug!(count = self.entries.len(), "app list loaded");
        Ok(&self.entries)
    }

    pub async fn save(&self) -> Result<(), String> {
        self.host.save_apps(self.entries.clone()).await
    }

    /// `Ok(false)` when `index` is already first or out of range.
    pub async fn move_up(&mut self, index: usize) -> Result<bool, String> {
        if index == 0 || index >= self.entries.len() {
            return Ok(false);
        }
        let previous = self.entries.clone();
        self.entries.swap(index, index - 1);
        self.commit(previous).await?;
        Ok(true)
    }

    /// `Ok(false)` when `index` is already last or out of range.
    pub async fn move_down(&mut self, index: usize) -> Result<bool, String> {
        if index + 1 >= self.entries.len() {
            return Ok(false);
        }
        let previous = self.entries.clone();
        self.entries.swap(index, index + 1);
        self.commit(previous).await?;
        Ok(true)
    }

    pub async fn delete(&mut self, index: usize) -> Result<AppEntry, String> {
        if index >= self.entries.len() {
            return Err(out_of_range(index, self.entries.len()));
        }
        let previous = self.entries.clone();
        let removed = self.entries.remove(index);
        self.commit(previous).await?;
        Ok(removed)
    }

    pub async fn add(&mut self, entry: AppEntry) -> Result<(), String> {
        let previous = self.entries.clone();
        self.entries.push(entry);
        self.commit(previous).await
    }

    /// Returns the new `checked` value.
    pub async fn toggle_checked(&mut self, index: usize) -> Result<bool, String> {
        let len = self.entries.len();
        let previous = self.entries.clone();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or_else(|| out_of_range(index, len))?;
        entry.checked = !entry.checked;
        let checked = entry.checked;
        self.commit(previous).await?;
        Ok(checked)
    }

    pub async fn rename(&mut self, index: usize, name: String) -> Result<(), String> {
        let len = self.entries.len();
        let previous = self.entries.clone();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or_else(|| out_of_range(index, len))?;
        entry.name = name;
        self.commit(previous).await
    }

    pub async fn set_path(
        &mut self,
        index: usize,
        path: String,
        icon: Option<String>,
    ) -> Result<(), String> {
        let len = self.entries.len();
        let previous = self.entries.clone();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or_else(|| out_of_range(index, len))?;
        entry.path = path;
        entry.icon = icon;
        self.commit(previous).await
    }

    async fn commit(&mut self, previous: Vec<AppEntry>) -> Result<(), String> {
        self.publish();
        if let Err(err) = self.save().await {
            tracing::warn!(error = %err, "app list save failed, reverting local change");
            self.entries = previous;
            self.publish();
            return Err(err);
        }
        Ok(())
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.entries.clone());
    }
}
