use personal_launcher_lib::apps::{AppEntry, AppListStore};
use personal_launcher_lib::desktop_host::{DesktopHost, DesktopUi};
use personal_launcher_lib::status_poller::{self, ProcessStatus, StatusSink};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;

struct NoUi;

impl DesktopUi for NoUi {
    fn pick_executable(&self) -> Option<String> {
        None
    }

    fn confirm(&self, _title: &str, _question: &str) -> bool {
        false
    }

    fn resize(&self, _width: u32, _height: u32) -> Result<(), String> {
        Ok(())
    }
}

struct ChannelSink(mpsc::UnboundedSender<Vec<ProcessStatus>>);

impl StatusSink for ChannelSink {
    fn publish(&self, statuses: &[ProcessStatus]) {
        let _ = self.0.send(statuses.to_vec());
    }
}

fn tmp_data_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "personal_launcher_it_{nanos}_{}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("create data dir");
    dir
}

fn host(data_dir: &PathBuf) -> Arc<DesktopHost<NoUi>> {
    Arc::new(DesktopHost::new(data_dir.clone(), Arc::new(NoUi), "0.1.0"))
}

#[tokio::test]
async fn store_persists_through_desktop_host_and_poller_reports_missing_apps_stopped() {
    let data_dir = tmp_data_dir();

    let mut store = AppListStore::new(host(&data_dir));
    assert!(store.load().await.expect("load empty").is_empty());
    store
        .add(AppEntry::new("Ghost", "/definitely/not/here/ghost-binary"))
        .await
        .expect("add ghost");
    store
        .add(AppEntry::new("Phantom", "/definitely/not/here/phantom-binary"))
        .await
        .expect("add phantom");
    store.toggle_checked(1).await.expect("toggle");

    let mut reloaded = AppListStore::new(host(&data_dir));
    let entries = reloaded.load().await.expect("reload").to_vec();
    assert_eq!(
        entries.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
        vec!["Ghost", "Phantom"]
    );
    assert!(entries[0].checked);
    assert!(!entries[1].checked);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut poller = status_poller::start(
        reloaded.host().clone(),
        reloaded.subscribe(),
        Arc::new(ChannelSink(tx)),
        Duration::from_secs(60),
    );
    let stopped = vec![ProcessStatus::Stopped; 2];
    assert_eq!(rx.recv().await, Some(stopped.clone()));
    let polled = tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("poll result");
    assert_eq!(polled, Some(stopped));

    poller.stop();
    poller.wait().await;
    let _ = std::fs::remove_dir_all(&data_dir);
}
