//! Usage: `LauncherHost` backed by the local machine (JSON app file, OS process table, native dialogs).
//!
//! Window and dialog access is behind `DesktopUi` so this module has no webview dependency; the
//! desktop shell supplies a Tauri-backed implementation.

use crate::apps::{AppEntry, AppRecord};
use crate::apps_file;
use crate::blocking;
use crate::host::{LauncherHost, RestartReport, StartReport, StopReport};
use crate::processes::{executable_key, launch, ProcessTable};
use crate::shared::mutex_ext::MutexExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const EXIT_WAIT_TIMEOUT: Duration = Duration::from_secs(3);
const EXIT_POLL_STEP: Duration = Duration::from_millis(100);
const RESTART_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Blocking UI primitives. Called from the blocking pool, never from an async task.
pub trait DesktopUi: Send + Sync + 'static {
    fn pick_executable(&self) -> Option<String>;

    fn confirm(&self, title: &str, question: &str) -> bool;

    fn resize(&self, width: u32, height: u32) -> Result<(), String>;
}

pub struct DesktopHost<U> {
    data_dir: PathBuf,
    ui: Arc<U>,
    processes: Arc<Mutex<ProcessTable>>,
    version: String,
}

impl<U: DesktopUi> DesktopHost<U> {
    pub fn new(data_dir: PathBuf, ui: Arc<U>, version: impl Into<String>) -> Self {
        Self {
            data_dir,
            ui,
            processes: Arc::new(Mutex::new(ProcessTable::default())),
            version: version.into(),
        }
    }

    #[cfg(test)]
    fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn swap_in_file(data_dir: &Path, index: usize, up: bool) -> Result<(), String> {
    let mut records = apps_file::read(data_dir)?;
    let other = if up {
        index.checked_sub(1)
    } else {
        index.checked_add(1).filter(|i| *i < records.len())
    };
    let Some(other) = other.filter(|_| index < records.len()) else {
        return Ok(());
    };
    records.swap(index, other);
    let entries: Vec<AppEntry> = records.into_iter().map(AppEntry::from_record).collect();
    apps_file::write(data_dir, &entries)
}

/// Polls until none of `keys` is running or the timeout passes. Returns whether all exited.
fn wait_for_exit(table: &mut ProcessTable, keys: &[String], timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        table.refresh();
        if !keys.iter().any(|key| table.is_running(key)) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(EXIT_POLL_STEP);
    }
}

fn start_checked(apps: &[AppEntry]) -> StartReport {
    let mut errors = Vec::new();
    for app in apps.iter().filter(|app| app.checked) {
        if let Err(err) = launch(app) {
            tracing::warn!(name = %app.display_name(), error = %err, "app start failed");
            errors.push(format!("{}: {err}", app.display_name()));
        }
    }
    StartReport {
        ok: errors.is_empty(),
        errors,
    }
}

/// Signals every matching process of the checked entries. Returns the report and the keys to
/// wait on; the caller waits without holding the shared table.
fn signal_checked(table: &mut ProcessTable, apps: &[AppEntry]) -> (StopReport, Vec<String>) {
    table.refresh();

    let mut killed = 0u32;
    let mut errors = Vec::new();
    let mut keys = Vec::new();
    for app in apps.iter().filter(|app| app.checked) {
        let Some(key) = executable_key(&app.path) else {
            errors.push(format!("{}: invalid path", app.display_name()));
            continue;
        };
        let pids = table.matching_pids(&key);
        if pids.is_empty() {
            continue;
        }
        let (signalled, failures) = table.terminate(&pids);
        killed += signalled;
        errors.extend(
            failures
                .into_iter()
                .map(|failure| format!("{}: {failure}", app.display_name())),
        );
        keys.push(key);
    }
    (StopReport { killed, errors }, keys)
}

fn stop_checked(processes: &Mutex<ProcessTable>, apps: &[AppEntry]) -> StopReport {
    let (report, keys) = signal_checked(&mut processes.lock_or_recover(), apps);
    if !keys.is_empty() && !wait_for_exit(&mut ProcessTable::default(), &keys, EXIT_WAIT_TIMEOUT) {
        tracing::warn!(apps = keys.len(), "some stopped apps are still running after timeout");
    }
    report
}

fn restart_one(processes: &Mutex<ProcessTable>, app: &AppEntry) -> RestartReport {
    if !Path::new(&app.path).is_file() {
        return RestartReport::failed("invalid path");
    }
    let Some(key) = executable_key(&app.path) else {
        return RestartReport::failed("invalid path");
    };

    let (was_running, failures) = {
        let mut table = processes.lock_or_recover();
        table.refresh();
        let pids = table.matching_pids(&key);
        if pids.is_empty() {
            (false, Vec::new())
        } else {
            (true, table.terminate(&pids).1)
        }
    };
    if let Some(failure) = failures.into_iter().next() {
        return RestartReport {
            ok: false,
            error: Some(failure),
            was_running,
        };
    }
    if was_running {
        std::thread::sleep(RESTART_SETTLE_DELAY);
        let exited = wait_for_exit(
            &mut ProcessTable::default(),
            std::slice::from_ref(&key),
            EXIT_WAIT_TIMEOUT,
        );
        if !exited {
            tracing::warn!(name = %app.display_name(), "app still running after terminate, relaunching anyway");
        }
    }

    match launch(app) {
        Ok(()) => RestartReport {
            ok: true,
            error: None,
            was_running,
        },
        Err(err) => RestartReport {
            ok: false,
            error: Some(err),
            was_running,
        },
    }
}

impl<U: DesktopUi> LauncherHost for DesktopHost<U> {
    async fn get_apps(&self) -> Result<Vec<AppRecord>, String> {
        let data_dir = self.data_dir.clone();
        blocking::run("apps_read", move || apps_file::read(&data_dir)).await
    }

    async fn save_apps(&self, apps: Vec<AppEntry>) -> Result<(), String> {
        let data_dir = self.data_dir.clone();
        blocking::run("apps_write", move || apps_file::write(&data_dir, &apps)).await
    }

    async fn browse_exe(&self) -> Result<Option<String>, String> {
        let ui = self.ui.clone();
        blocking::run("browse_exe", move || Ok(ui.pick_executable())).await
    }

    async fn get_icon(&self, _path: String) -> Result<Option<String>, String> {
        // Icon extraction is not available on this host.
        Ok(None)
    }

    async fn ask_yes_no(&self, title: String, question: String) -> Result<bool, String> {
        let ui = self.ui.clone();
        blocking::run("ask_yes_no", move || Ok(ui.confirm(&title, &question))).await
    }

    async fn start_selected(&self, apps: Vec<AppEntry>) -> Result<StartReport, String> {
        blocking::run("apps_start", move || Ok(start_checked(&apps))).await
    }

    async fn stop_selected(&self, apps: Vec<AppEntry>) -> Result<StopReport, String> {
        let processes = self.processes.clone();
        blocking::run("apps_stop", move || Ok(stop_checked(&processes, &apps))).await
    }

    async fn restart_app(&self, app: AppEntry) -> Result<RestartReport, String> {
        let processes = self.processes.clone();
        blocking::run("app_restart", move || Ok(restart_one(&processes, &app))).await
    }

    async fn get_all_process_statuses(&self, apps: Vec<AppEntry>) -> Result<Vec<bool>, String> {
        let processes = self.processes.clone();
        blocking::run("process_statuses", move || {
            let mut table = processes.lock_or_recover();
            table.refresh();
            Ok(apps.iter().map(|app| table.entry_is_running(app)).collect())
        })
        .await
    }

    async fn move_app_up(&self, index: usize) -> Result<(), String> {
        let data_dir = self.data_dir.clone();
        blocking::run("apps_move_up", move || swap_in_file(&data_dir, index, true)).await
    }

    async fn move_app_down(&self, index: usize) -> Result<(), String> {
        let data_dir = self.data_dir.clone();
        blocking::run("apps_move_down", move || swap_in_file(&data_dir, index, false)).await
    }

    async fn resize_window(&self, width: u32, height: u32) -> Result<(), String> {
        let ui = self.ui.clone();
        blocking::run("window_resize", move || ui.resize(width, height)).await
    }

    async fn get_version(&self) -> Result<String, String> {
        Ok(self.version.clone())
    }
}
