//! Usage: Run synchronous work (file IO, process table scans, native dialogs) on the blocking pool.

pub(crate) async fn run<T, F>(label: &'static str, f: F) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, String> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| format!("TASK_JOIN: {label} worker failed: {e}"))?
}
