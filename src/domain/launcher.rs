//! Usage: Dispatch user actions (add/edit flows, bulk start/stop, restart) over the app list store.
//!
//! Store mutations surface their errors to the caller. Host calls behind user actions are turned
//! into notices instead, so the shell only has to display them.

use crate::apps::{default_name_for_path, AppEntry, AppListStore};
use crate::host::{LauncherHost, StartReport, StopReport};
use crate::notice::{self, NoticeEventPayload, NoticeLevel};
use serde::Serialize;
use std::sync::Arc;

pub const ADMIN_PROMPT_TITLE: &str = "Administrator rights";
pub const ADMIN_PROMPT_QUESTION: &str = "Launch this application as administrator?";

/// A picked executable waiting for the user to confirm its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppDraft {
    pub path: String,
    pub default_name: String,
}

pub struct Launcher<H> {
    store: AppListStore<H>,
}

impl<H: LauncherHost> Launcher<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self {
            store: AppListStore::new(host),
        }
    }

    pub fn store(&self) -> &AppListStore<H> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AppListStore<H> {
        &mut self.store
    }

    fn host(&self) -> &Arc<H> {
        self.store.host()
    }

    pub async fn pick_new_app(&self) -> Result<Option<AppDraft>, String> {
        let Some(path) = self.pick_path().await? else {
            return Ok(None);
        };
        let default_name = default_name_for_path(&path);
        Ok(Some(AppDraft { path, default_name }))
    }

    /// Completes an add started by `pick_new_app`. A blank name cancels the add.
    pub async fn confirm_new_app(
        &mut self,
        path: String,
        name: String,
    ) -> Result<Option<AppEntry>, String> {
        let path = path.trim().to_string();
        if path.is_empty() {
            return Err("SEC_INVALID_INPUT: executable path is required".to_string());
        }
        let name = name.trim().to_string();
        if name.is_empty() {
            return Ok(None);
        }

        let admin_required = self
            .host()
            .ask_yes_no(
                ADMIN_PROMPT_TITLE.to_string(),
                ADMIN_PROMPT_QUESTION.to_string(),
            )
            .await?;
        let icon = self.icon_for(&path).await;

        let entry = AppEntry {
            name,
            path,
            icon,
            checked: true,
            admin_required,
        };
        self.store.add(entry.clone()).await?;
        tracing::info!(name = %entry.name, path = %entry.path, admin_required, "app added");
        Ok(Some(entry))
    }

    /// A blank name leaves the entry as it is and returns `Ok(false)`.
    pub async fn rename(&mut self, index: usize, name: String) -> Result<bool, String> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        self.store.rename(index, name.to_string()).await?;
        Ok(true)
    }

    /// Re-points an entry at a newly picked executable. `Ok(false)` when the picker was cancelled.
    pub async fn change_path(&mut self, index: usize) -> Result<bool, String> {
        if self.store.get(index).is_none() {
            return Err(format!(
                "SEC_INVALID_INPUT: app index out of range: {index} (len={})",
                self.store.len()
            ));
        }
        let Some(path) = self.pick_path().await? else {
            return Ok(false);
        };
        let icon = self.icon_for(&path).await;
        self.store.set_path(index, path, icon).await?;
        Ok(true)
    }

    pub async fn start_selected(&self) -> Option<NoticeEventPayload> {
        match self.host().start_selected(self.store.entries().to_vec()).await {
            Ok(report) => start_notice(&report),
            Err(err) => {
                tracing::error!(error = %err, "start selected failed");
                Some(notice::build(
                    NoticeLevel::Error,
                    Some("Start failed".to_string()),
                    err,
                ))
            }
        }
    }

    pub async fn stop_selected(&self) -> NoticeEventPayload {
        match self.host().stop_selected(self.store.entries().to_vec()).await {
            Ok(report) => stop_notice(&report),
            Err(err) => {
                tracing::error!(error = %err, "stop selected failed");
                notice::build(NoticeLevel::Error, Some("Stop failed".to_string()), err)
            }
        }
    }

    /// `None` on success and for an index that no longer exists.
    pub async fn restart(&self, index: usize) -> Option<NoticeEventPayload> {
        let Some(entry) = self.store.get(index).cloned() else {
            tracing::debug!(index, "restart ignored: index out of range");
            return None;
        };
        let name = entry.display_name().to_string();

        let error = match self.host().restart_app(entry).await {
            Ok(report) if report.ok => {
                tracing::info!(name = %name, was_running = report.was_running, "app restarted");
                return None;
            }
            Ok(report) => report.error.unwrap_or_else(|| "unknown error".to_string()),
            Err(err) => err,
        };

        tracing::warn!(name = %name, error = %error, "restart failed");
        Some(notice::build(
            NoticeLevel::Error,
            Some("Restart failed".to_string()),
            format!("{name}: {error}"),
        ))
    }

    pub async fn resize_window(&self, width: u32, height: u32) {
        if let Err(err) = self.host().resize_window(width, height).await {
            tracing::debug!(error = %err, width, height, "window resize failed");
        }
    }

    async fn pick_path(&self) -> Result<Option<String>, String> {
        let picked = self.host().browse_exe().await?;
        Ok(picked
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()))
    }

    /// Icons are cosmetic; a failed lookup leaves the entry without one.
    async fn icon_for(&self, path: &str) -> Option<String> {
        match self.host().get_icon(path.to_string()).await {
            Ok(icon) => icon,
            Err(err) => {
                tracing::warn!(path = %path, error = %err, "icon lookup failed");
                None
            }
        }
    }
}

pub fn start_notice(report: &StartReport) -> Option<NoticeEventPayload> {
    let body = if !report.errors.is_empty() {
        report.errors.join("\n")
    } else if !report.ok {
        "Some applications could not be started.".to_string()
    } else {
        return None;
    };
    Some(notice::build(
        NoticeLevel::Error,
        Some("Start errors".to_string()),
        body,
    ))
}

pub fn stop_notice(report: &StopReport) -> NoticeEventPayload {
    let summary = format!("{} process(es) closed", report.killed);
    if report.errors.is_empty() {
        return notice::build(NoticeLevel::Info, Some("Stop".to_string()), summary);
    }
    notice::build(
        NoticeLevel::Warning,
        Some("Stop".to_string()),
        format!("{summary}\n\nErrors:\n{}", report.errors.join("\n")),
    )
}
