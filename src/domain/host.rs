//! Usage: Host procedures the launcher core depends on (persistence, dialogs, processes).
//!
//! The core never touches the filesystem or the process table itself; everything goes through
//! a `LauncherHost`. The desktop shell injects `infra::desktop_host::DesktopHost`, tests inject a
//! recording fake.

use crate::apps::{AppEntry, AppRecord};
use serde::{Deserialize, Serialize};
use std::future::Future;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartReport {
    pub ok: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopReport {
    pub killed: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestartReport {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub was_running: bool,
}

impl RestartReport {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            was_running: false,
        }
    }
}

/// All procedures are asynchronous and may be called concurrently (a status poll can overlap a
/// save). Errors are `CODE: message` strings.
pub trait LauncherHost: Send + Sync + 'static {
    fn get_apps(&self) -> impl Future<Output = Result<Vec<AppRecord>, String>> + Send;

    fn save_apps(&self, apps: Vec<AppEntry>) -> impl Future<Output = Result<(), String>> + Send;

    /// `None` when the user cancels the picker.
    fn browse_exe(&self) -> impl Future<Output = Result<Option<String>, String>> + Send;

    fn get_icon(&self, path: String) -> impl Future<Output = Result<Option<String>, String>> + Send;

    fn ask_yes_no(
        &self,
        title: String,
        question: String,
    ) -> impl Future<Output = Result<bool, String>> + Send;

    /// Receives the whole list; only `checked` entries are launched.
    fn start_selected(
        &self,
        apps: Vec<AppEntry>,
    ) -> impl Future<Output = Result<StartReport, String>> + Send;

    /// Receives the whole list; only `checked` entries are stopped.
    fn stop_selected(
        &self,
        apps: Vec<AppEntry>,
    ) -> impl Future<Output = Result<StopReport, String>> + Send;

    fn restart_app(&self, app: AppEntry)
        -> impl Future<Output = Result<RestartReport, String>> + Send;

    /// One flag per input entry, same order as the input.
    fn get_all_process_statuses(
        &self,
        apps: Vec<AppEntry>,
    ) -> impl Future<Output = Result<Vec<bool>, String>> + Send;

    fn move_app_up(&self, index: usize) -> impl Future<Output = Result<(), String>> + Send;

    fn move_app_down(&self, index: usize) -> impl Future<Output = Result<(), String>> + Send;

    fn resize_window(
        &self,
        width: u32,
        height: u32,
    ) -> impl Future<Output = Result<(), String>> + Send;

    fn get_version(&self) -> impl Future<Output = Result<String, String>> + Send;
}
