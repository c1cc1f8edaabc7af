//! Usage: Install the process-wide tracing subscriber (stderr + daily rolling file).
//!
//! `RUST_LOG` overrides the default `info` filter. `log` records are bridged into tracing.

use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";
const LOG_FILE_PREFIX: &str = "launcher.log";

// Holds the file writer guard for the life of the process; dropping it stops file output.
static INSTALLED: OnceLock<Option<WorkerGuard>> = OnceLock::new();

pub fn init(log_dir: Option<&Path>) {
    INSTALLED.get_or_init(|| install(log_dir));
}

fn install(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_writer = log_dir.and_then(|dir| match std::fs::create_dir_all(dir) {
        Ok(()) => Some(tracing_appender::non_blocking(
            tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX),
        )),
        Err(err) => {
            eprintln!("log dir unavailable ({}): {err}", dir.display());
            None
        }
    });
    let (file_writer, guard) = match file_writer {
        Some((writer, guard)) => (Some(writer), Some(guard)),
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_writer.map(|writer| fmt::layer().with_ansi(false).with_writer(writer)));

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // Another subscriber (e.g. a test harness) won; keep using it.
        return guard;
    }
    let _ = tracing_log::LogTracer::init();

    if let Some(dir) = log_dir {
        tracing::info!(dir = %dir.display(), "logging initialized");
    }
    guard
}
