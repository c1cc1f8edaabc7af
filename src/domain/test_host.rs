//! Recording in-memory host shared by store, poller and controller tests.

use crate::apps::{AppEntry, AppRecord};
use crate::host::{LauncherHost, RestartReport, StartReport, StopReport};
use crate::shared::mutex_ext::MutexExt;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct FakeState {
    records: Vec<AppRecord>,
    get_apps_error: Option<String>,
    save_error: Option<String>,
    saved: Vec<Vec<AppEntry>>,
    browse: VecDeque<Option<String>>,
    icon: Option<String>,
    icon_error: Option<String>,
    yes_no: bool,
    questions: Vec<(String, String)>,
    start: Option<Result<StartReport, String>>,
    stop: Option<Result<StopReport, String>>,
    restart: Option<Result<RestartReport, String>>,
    started_with: Vec<Vec<AppEntry>>,
    restarted: Vec<AppEntry>,
    statuses: VecDeque<Result<Vec<bool>, String>>,
    polled_with: Vec<Vec<AppEntry>>,
    poll_delay: Duration,
    resized: Vec<(u32, u32)>,
}

#[derive(Default)]
pub(crate) struct FakeHost {
    state: Mutex<FakeState>,
    polls_started: AtomicUsize,
}

impl FakeHost {
    pub(crate) fn with_entries(entries: Vec<AppEntry>) -> Self {
        let host = Self::default();
        host.set_records(entries.into_iter().map(AppRecord::from).collect());
        host
    }

    pub(crate) fn set_records(&self, records: Vec<AppRecord>) {
        self.state.lock_or_recover().records = records;
    }

    pub(crate) fn fail_get_apps(&self, err: &str) {
        self.state.lock_or_recover().get_apps_error = Some(err.to_string());
    }

    pub(crate) fn fail_save_apps(&self, err: &str) {
        self.state.lock_or_recover().save_error = Some(err.to_string());
    }

    pub(crate) fn push_browse(&self, picked: Option<&str>) {
        self.state
            .lock_or_recover()
            .browse
            .push_back(picked.map(str::to_string));
    }

    pub(crate) fn set_icon(&self, icon: Option<&str>) {
        self.state.lock_or_recover().icon = icon.map(str::to_string);
    }

    pub(crate) fn fail_get_icon(&self, err: &str) {
        self.state.lock_or_recover().icon_error = Some(err.to_string());
    }

    pub(crate) fn set_yes_no(&self, answer: bool) {
        self.state.lock_or_recover().yes_no = answer;
    }

    pub(crate) fn set_start(&self, out: Result<StartReport, String>) {
        self.state.lock_or_recover().start = Some(out);
    }

    pub(crate) fn set_stop(&self, out: Result<StopReport, String>) {
        self.state.lock_or_recover().stop = Some(out);
    }

    pub(crate) fn set_restart(&self, out: Result<RestartReport, String>) {
        self.state.lock_or_recover().restart = Some(out);
    }

    pub(crate) fn push_statuses(&self, out: Result<Vec<bool>, String>) {
        self.state.lock_or_recover().statuses.push_back(out);
    }

    pub(crate) fn set_poll_delay(&self, delay: Duration) {
        self.state.lock_or_recover().poll_delay = delay;
    }

    pub(crate) fn save_count(&self) -> usize {
        self.state.lock_or_recover().saved.len()
    }

    pub(crate) fn last_saved(&self) -> Option<Vec<AppEntry>> {
        self.state.lock_or_recover().saved.last().cloned()
    }

    pub(crate) fn questions(&self) -> Vec<(String, String)> {
        self.state.lock_or_recover().questions.clone()
    }

    pub(crate) fn started_with(&self) -> Vec<Vec<AppEntry>> {
        self.state.lock_or_recover().started_with.clone()
    }

    pub(crate) fn restarted(&self) -> Vec<AppEntry> {
        self.state.lock_or_recover().restarted.clone()
    }

    pub(crate) fn polled_with(&self) -> Vec<Vec<AppEntry>> {
        self.state.lock_or_recover().polled_with.clone()
    }

    pub(crate) fn polls_started(&self) -> usize {
        self.polls_started.load(Ordering::SeqCst)
    }

    pub(crate) fn resized(&self) -> Vec<(u32, u32)> {
        self.state.lock_or_recover().resized.clone()
    }
}

impl LauncherHost for FakeHost {
    async fn get_apps(&self) -> Result<Vec<AppRecord>, String> {
        let state = self.state.lock_or_recover();
        if let Some(err) = state.get_apps_error.clone() {
            return Err(err);
        }
        Ok(state.records.clone())
    }

    async fn save_apps(&self, apps: Vec<AppEntry>) -> Result<(), String> {
        let mut state = self.state.lock_or_recover();
        if let Some(err) = state.save_error.clone() {
            return Err(err);
        }
        state.records = apps.iter().cloned().map(AppRecord::from).collect();
        state.saved.push(apps);
        Ok(())
    }

    async fn browse_exe(&self) -> Result<Option<String>, String> {
        Ok(self.state.lock_or_recover().browse.pop_front().flatten())
    }

    async fn get_icon(&self, _path: String) -> Result<Option<String>, String> {
        let state = self.state.lock_or_recover();
        if let Some(err) = state.icon_error.clone() {
            return Err(err);
        }
        Ok(state.icon.clone())
    }

    async fn ask_yes_no(&self, title: String, question: String) -> Result<bool, String> {
        let mut state = self.state.lock_or_recover();
        state.questions.push((title, question));
        Ok(state.yes_no)
    }

    async fn start_selected(&self, apps: Vec<AppEntry>) -> Result<StartReport, String> {
        let mut state = self.state.lock_or_recover();
        state.started_with.push(apps);
        state.start.clone().unwrap_or_else(|| {
            Ok(StartReport {
                ok: true,
                errors: Vec::new(),
            })
        })
    }

    async fn stop_selected(&self, _apps: Vec<AppEntry>) -> Result<StopReport, String> {
        self.state
            .lock_or_recover()
            .stop
            .clone()
            .unwrap_or_else(|| Ok(StopReport::default()))
    }

    async fn restart_app(&self, app: AppEntry) -> Result<RestartReport, String> {
        let mut state = self.state.lock_or_recover();
        state.restarted.push(app);
        state.restart.clone().unwrap_or_else(|| {
            Ok(RestartReport {
                ok: true,
                error: None,
                was_running: false,
            })
        })
    }

    async fn get_all_process_statuses(&self, apps: Vec<AppEntry>) -> Result<Vec<bool>, String> {
        self.polls_started.fetch_add(1, Ordering::SeqCst);
        let (delay, scripted) = {
            let mut state = self.state.lock_or_recover();
            let len = apps.len();
            state.polled_with.push(apps);
            let scripted = state
                .statuses
                .pop_front()
                .unwrap_or_else(|| Ok(vec![false; len]));
            (state.poll_delay, scripted)
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        scripted
    }

    async fn move_app_up(&self, _index: usize) -> Result<(), String> {
        Ok(())
    }

    async fn move_app_down(&self, _index: usize) -> Result<(), String> {
        Ok(())
    }

    async fn resize_window(&self, width: u32, height: u32) -> Result<(), String> {
        self.state.lock_or_recover().resized.push((width, height));
        Ok(())
    }

    async fn get_version(&self) -> Result<String, String> {
        Ok("0.0.0-test".to_string())
    }
}
