//! Usage: Process table helpers for the desktop host (match by executable name, terminate, launch).

use crate::apps::{file_name_of, AppEntry};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};
use sysinfo::{Pid, Process, ProcessesToUpdate, Signal, System};

/// Lowercased executable file name used to match running processes against an entry.
pub(crate) fn executable_key(path: &str) -> Option<String> {
    file_name_of(path).map(str::to_lowercase)
}

pub(crate) fn process_matches(name: &OsStr, exe: Option<&Path>, key: &str) -> bool {
    if name.to_string_lossy().to_lowercase() == key {
        return true;
    }
    // Linux truncates process names to 15 bytes; the executable path is authoritative there.
    exe.and_then(|p| p.file_name())
        .is_some_and(|file_name| file_name.to_string_lossy().to_lowercase() == key)
}

pub(crate) struct ProcessTable {
    sys: System,
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self { sys: System::new() }
    }
}

impl ProcessTable {
    pub(crate) fn refresh(&mut self) {
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
    }

    /// Process entries only; Linux also lists each thread as its own entry.
    fn programs(&self) -> impl Iterator<Item = (&Pid, &Process)> {
        self.sys
            .processes()
            .iter()
            .filter(|(_, process)| process.thread_kind().is_none())
    }

    pub(crate) fn matching_pids(&self, key: &str) -> Vec<Pid> {
        self.programs()
            .filter(|(_, process)| process_matches(process.name(), process.exe(), key))
            .map(|(pid, _)| *pid)
            .collect()
    }

    pub(crate) fn is_running(&self, key: &str) -> bool {
        self.programs()
            .any(|(_, process)| process_matches(process.name(), process.exe(), key))
    }

    /// Entries whose executable no longer exists on disk are never reported running.
    pub(crate) fn entry_is_running(&self, entry: &AppEntry) -> bool {
        if !Path::new(&entry.path).exists() {
            return false;
        }
        executable_key(&entry.path).is_some_and(|key| self.is_running(&key))
    }

    /// Sends a terminate request (or a kill where terminate is unsupported) to each pid.
    /// Returns how many were signalled and one message per failure.
    pub(crate) fn terminate(&self, pids: &[Pid]) -> (u32, Vec<String>) {
        let mut signalled = 0u32;
        let mut failures = Vec::new();
        for pid in pids {
            let Some(process) = self.sys.process(*pid) else {
                // Exited between refresh and terminate.
                continue;
            };
            let sent = process
                .kill_with(Signal::Term)
                .unwrap_or_else(|| process.kill());
            if sent {
                signalled += 1;
            } else {
                failures.push(format!("failed to terminate pid {pid}"));
            }
        }
        (signalled, failures)
    }
}

/// Starts the entry's executable detached from the launcher, in its own directory.
pub(crate) fn launch(entry: &AppEntry) -> Result<(), String> {
    let path = Path::new(&entry.path);
    if !path.is_file() {
        return Err(format!("executable not found: {}", entry.path));
    }
    if entry.admin_required {
        tracing::warn!(
            path = %entry.path,
            "elevated launch is not handled by the desktop host, starting with current rights"
        );
    }

    let mut cmd = Command::new(path);
    if let Some(dir) = path.parent().filter(|dir| dir.is_dir()) {
        cmd.current_dir(dir);
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let mut child = cmd.spawn().map_err(|e| e.to_string())?;
    tracing::info!(path = %entry.path, pid = child.id(), "app launched");

    // Reap the child so it does not linger as a zombie after exit.
    std::thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(())
}
