//! Usage: Fixed-interval running/stopped overlay for the app list.
//!
//! - Input: list snapshots from `AppListStore::subscribe`.
//! - Output: one `ProcessStatus` per entry, pushed to a `StatusSink`.
//! - A failed or malformed poll is logged and skipped; the next tick retries.

use crate::apps::AppEntry;
use crate::host::LauncherHost;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Running,
    #[default]
    Stopped,
}

impl From<bool> for ProcessStatus {
    fn from(running: bool) -> Self {
        if running {
            Self::Running
        } else {
            Self::Stopped
        }
    }
}

pub trait StatusSink: Send + Sync + 'static {
    fn publish(&self, statuses: &[ProcessStatus]);
}

/// Validates a positional poll result against the list it was computed for.
pub fn statuses_from_poll(
    expected_len: usize,
    running: Vec<bool>,
) -> Result<Vec<ProcessStatus>, String> {
    if running.len() != expected_len {
        return Err(format!(
            "HOST_ERROR: status result length {} does not match app count {expected_len}",
            running.len()
        ));
    }
    Ok(running.into_iter().map(ProcessStatus::from).collect())
}

/// Current overlay plus the list shape (paths in order) it belongs to.
#[derive(Debug, Default)]
struct Overlay {
    paths: Vec<String>,
    statuses: Vec<ProcessStatus>,
}

impl Overlay {
    fn same_shape(paths: &[String], apps: &[AppEntry]) -> bool {
        paths.len() == apps.len() && paths.iter().zip(apps).all(|(p, a)| *p == a.path)
    }

    /// Adding, deleting or reordering entries invalidates every flag; toggles and renames do not.
    fn reset_if_reshaped(&mut self, apps: &[AppEntry]) -> bool {
        if Self::same_shape(&self.paths, apps) {
            return false;
        }
        self.paths = apps.iter().map(|a| a.path.clone()).collect();
        self.statuses = vec![ProcessStatus::Stopped; apps.len()];
        true
    }
}

pub struct StatusPollerHandle {
    refresh: Arc<Notify>,
    stopped: Arc<AtomicBool>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl StatusPollerHandle {
    /// Polls now instead of waiting for the next tick.
    pub fn request_refresh(&self) {
        self.refresh.notify_one();
    }

    /// An in-flight host call is not cancelled; its result is dropped when it arrives.
    pub fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Waits for the poll task to exit. Call after `stop`.
    pub async fn wait(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for StatusPollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Must be called from within a tokio runtime.
pub fn start<H, S>(
    host: Arc<H>,
    apps: watch::Receiver<Vec<AppEntry>>,
    sink: Arc<S>,
    interval: Duration,
) -> StatusPollerHandle
where
    H: LauncherHost,
    S: StatusSink,
{
    let refresh = Arc::new(Notify::new());
    let stopped = Arc::new(AtomicBool::new(false));
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let task = tokio::spawn(run(
        host,
        apps,
        sink,
        interval,
        refresh.clone(),
        stopped.clone(),
        shutdown_rx,
    ));

    tracing::info!(interval_ms = interval.as_millis() as u64, "status poller started");

    StatusPollerHandle {
        refresh,
        stopped,
        shutdown: Some(shutdown_tx),
        task: Some(task),
    }
}

async fn run<H, S>(
    host: Arc<H>,
    mut apps: watch::Receiver<Vec<AppEntry>>,
    sink: Arc<S>,
    interval: Duration,
    refresh: Arc<Notify>,
    stopped: Arc<AtomicBool>,
    mut shutdown: oneshot::Receiver<()>,
) where
    H: LauncherHost,
    S: StatusSink,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut overlay = Overlay::default();
    let mut store_alive = true;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
            _ = refresh.notified() => {}
            changed = apps.changed(), if store_alive => {
                if changed.is_err() {
                    store_alive = false;
                    continue;
                }
                let reshaped = {
                    let snapshot = apps.borrow_and_update();
                    overlay.reset_if_reshaped(&snapshot)
                };
                // Consumers re-render on every list change; republish so they keep the overlay.
                sink.publish(&overlay.statuses);
                if !reshaped {
                    continue;
                }
            }
        }

        if stopped.load(Ordering::SeqCst) {
            break;
        }

        let snapshot = apps.borrow_and_update().clone();
        if overlay.reset_if_reshaped(&snapshot) {
            sink.publish(&overlay.statuses);
        }
        if snapshot.is_empty() {
            continue;
        }

        let expected_len = snapshot.len();
        let result = host.get_all_process_statuses(snapshot).await;

        if stopped.load(Ordering::SeqCst) {
            tracing::debug!("status poller stopped during poll, result discarded");
            break;
        }
        if !Overlay::same_shape(&overlay.paths, &apps.borrow()) {
            tracing::debug!("app list changed during poll, result discarded");
            continue;
        }

        match result.and_then(|running| statuses_from_poll(expected_len, running)) {
            Ok(statuses) => {
                overlay.statuses = statuses;
                sink.publish(&overlay.statuses);
            }
            Err(err) => {
                tracing::warn!(error = %err, "status poll failed, skipping this cycle");
            }
        }
    }

    tracing::info!("status poller stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::AppListStore;
    use crate::domain::test_host::FakeHost;
    use tokio::sync::mpsc;

    struct ChannelSink(mpsc::UnboundedSender<Vec<ProcessStatus>>);

    impl StatusSink for ChannelSink {
        fn publish(&self, statuses: &[ProcessStatus]) {
            let _ = self.0.send(statuses.to_vec());
        }
    }

    use ProcessStatus::{Running, Stopped};

    fn entries(names: &[&str]) -> Vec<AppEntry> {
        names
            .iter()
            .map(|n| AppEntry::new(*n, format!("/apps/{n}")))
            .collect()
    }

    async fn loaded_store(host: &Arc<FakeHost>) -> AppListStore<FakeHost> {
        let mut store = AppListStore::new(host.clone());
        store.load().await.expect("load");
        store
    }

    fn sink() -> (Arc<ChannelSink>, mpsc::UnboundedReceiver<Vec<ProcessStatus>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(ChannelSink(tx)), rx)
    }

    #[test]
    fn statuses_from_poll_maps_positionally() {
        let out = statuses_from_poll(3, vec![true, false, true]).expect("statuses");
        assert_eq!(out, vec![Running, Stopped, Running]);
    }

    #[test]
    fn statuses_from_poll_rejects_length_mismatch() {
        let err = statuses_from_poll(3, vec![true]).unwrap_err();
        assert!(err.starts_with("HOST_ERROR:"), "{err}");
    }

    #[test]
    fn overlay_reset_ignores_toggles_but_not_reorders() {
        let mut overlay = Overlay::default();
        let mut apps = entries(&["A", "B"]);
        assert!(overlay.reset_if_reshaped(&apps));
        overlay.statuses = vec![Running, Stopped];

        apps[0].checked = false;
        apps[1].name = "Renamed".to_string();
        assert!(!overlay.reset_if_reshaped(&apps));
        assert_eq!(overlay.statuses, vec![Running, Stopped]);

        apps.swap(0, 1);
        assert!(overlay.reset_if_reshaped(&apps));
        assert_eq!(overlay.statuses, vec![Stopped, Stopped]);
    }

    #[tokio::test(start_paused = true)]
    async fn first_poll_marks_running_entries() {
        let host = Arc::new(FakeHost::with_entries(entries(&["A", "B", "C"])));
        host.push_statuses(Ok(vec![true, false, true]));
        let store = loaded_store(&host).await;
        let (sink, mut rx) = sink();

        let mut handle = start(host.clone(), store.subscribe(), sink, DEFAULT_POLL_INTERVAL);

        assert_eq!(rx.recv().await, Some(vec![Stopped, Stopped, Stopped]));
        assert_eq!(rx.recv().await, Some(vec![Running, Stopped, Running]));

        handle.stop();
        handle.wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_poll_is_skipped_and_retried_next_tick() {
        let host = Arc::new(FakeHost::with_entries(entries(&["A"])));
        host.push_statuses(Err("HOST_ERROR: bridge busy".to_string()));
        host.push_statuses(Ok(vec![true]));
        let store = loaded_store(&host).await;
        let (sink, mut rx) = sink();

        let mut handle = start(host.clone(), store.subscribe(), sink, Duration::from_secs(2));

        assert_eq!(rx.recv().await, Some(vec![Stopped]));
        assert_eq!(rx.recv().await, Some(vec![Running]));
        assert_eq!(host.polls_started(), 2);

        handle.stop();
        handle.wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_result_does_not_touch_overlay() {
        let host = Arc::new(FakeHost::with_entries(entries(&["A", "B"])));
        host.push_statuses(Ok(vec![true]));
        host.push_statuses(Ok(vec![false, true]));
        let store = loaded_store(&host).await;
        let (sink, mut rx) = sink();

        let mut handle = start(host.clone(), store.subscribe(), sink, Duration::from_secs(2));

        assert_eq!(rx.recv().await, Some(vec![Stopped, Stopped]));
        assert_eq!(rx.recv().await, Some(vec![Stopped, Running]));

        handle.stop();
        handle.wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn list_change_resets_overlay_and_polls_new_list() {
        let host = Arc::new(FakeHost::with_entries(entries(&["A", "B"])));
        host.push_statuses(Ok(vec![true, true]));
        host.push_statuses(Ok(vec![true]));
        let mut store = loaded_store(&host).await;
        let (sink, mut rx) = sink();

        let mut handle = start(host.clone(), store.subscribe(), sink, Duration::from_secs(60));

        assert_eq!(rx.recv().await, Some(vec![Stopped, Stopped]));
        assert_eq!(rx.recv().await, Some(vec![Running, Running]));

        store.delete(0).await.expect("delete");

        assert_eq!(rx.recv().await, Some(vec![Stopped]));
        assert_eq!(rx.recv().await, Some(vec![Running]));
        let polled = host.polled_with();
        assert_eq!(polled.last().map(|l| l[0].name.as_str()), Some("B"));

        handle.stop();
        handle.wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_republishes_overlay_without_polling() {
        let host = Arc::new(FakeHost::with_entries(entries(&["A", "B"])));
        host.push_statuses(Ok(vec![true, false]));
        let mut store = loaded_store(&host).await;
        let (sink, mut rx) = sink();

        let mut handle = start(host.clone(), store.subscribe(), sink, Duration::from_secs(60));

        assert_eq!(rx.recv().await, Some(vec![Stopped, Stopped]));
        assert_eq!(rx.recv().await, Some(vec![Running, Stopped]));

        store.toggle_checked(0).await.expect("toggle");
        assert_eq!(rx.recv().await, Some(vec![Running, Stopped]));
        store.rename(1, "Renamed".to_string()).await.expect("rename");
        assert_eq!(rx.recv().await, Some(vec![Running, Stopped]));
        assert_eq!(host.polls_started(), 1);

        handle.stop();
        handle.wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn result_for_outdated_list_is_discarded() {
        let host = Arc::new(FakeHost::with_entries(entries(&["A", "B"])));
        host.set_poll_delay(Duration::from_secs(5));
        host.push_statuses(Ok(vec![true, true]));
        host.push_statuses(Ok(vec![true]));
        let mut store = loaded_store(&host).await;
        let (sink, mut rx) = sink();

        let mut handle = start(host.clone(), store.subscribe(), sink, Duration::from_secs(60));

        assert_eq!(rx.recv().await, Some(vec![Stopped, Stopped]));
        while host.polls_started() == 0 {
            tokio::task::yield_now().await;
        }
        store.delete(0).await.expect("delete");

        assert_eq!(rx.recv().await, Some(vec![Stopped]));
        assert_eq!(rx.recv().await, Some(vec![Running]));
        assert_eq!(host.polls_started(), 2);
        assert!(rx.try_recv().is_err());

        handle.stop();
        handle.wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn request_refresh_polls_before_next_tick() {
        let host = Arc::new(FakeHost::with_entries(entries(&["A"])));
        host.push_statuses(Ok(vec![false]));
        host.push_statuses(Ok(vec![true]));
        let store = loaded_store(&host).await;
        let (sink, mut rx) = sink();

        let mut handle = start(host.clone(), store.subscribe(), sink, Duration::from_secs(3600));

        assert_eq!(rx.recv().await, Some(vec![Stopped]));
        assert_eq!(rx.recv().await, Some(vec![Stopped]));

        let before = tokio::time::Instant::now();
        handle.request_refresh();
        assert_eq!(rx.recv().await, Some(vec![Running]));
        assert!(before.elapsed() < Duration::from_secs(3600));

        handle.stop();
        handle.wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_discards_in_flight_result() {
        let host = Arc::new(FakeHost::with_entries(entries(&["A"])));
        host.set_poll_delay(Duration::from_secs(5));
        host.push_statuses(Ok(vec![true]));
        let store = loaded_store(&host).await;
        let (sink, mut rx) = sink();

        let mut handle = start(host.clone(), store.subscribe(), sink, DEFAULT_POLL_INTERVAL);

        assert_eq!(rx.recv().await, Some(vec![Stopped]));
        while host.polls_started() == 0 {
            tokio::task::yield_now().await;
        }
        handle.stop();
        assert!(handle.is_stopped());
        handle.wait().await;

        assert_eq!(host.polls_started(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_list_never_calls_host() {
        let host = Arc::new(FakeHost::default());
        let store = loaded_store(&host).await;
        let (sink, _rx) = sink();

        let mut handle = start(host.clone(), store.subscribe(), sink, Duration::from_secs(2));
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(host.polls_started(), 0);

        handle.stop();
        handle.wait().await;
    }
}
