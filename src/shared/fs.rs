//! Usage: Small filesystem helpers shared across infra adapters (atomic writes, optional reads).

use std::path::{Path, PathBuf};

pub(crate) fn read_optional_to_string(path: &Path) -> Result<Option<String>, String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(format!("failed to read {}: {e}", path.display())),
    }
}

/// Writes through `<name>.tmp` and a rename so readers never observe a half-written file.
pub(crate) fn write_file_atomic(path: &Path, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create dir {}: {e}", parent.display()))?;
    }

    let file_name = path.file_name().and_then(|v| v.to_str()).unwrap_or("file");
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    std::fs::write(&tmp_path, bytes)
        .map_err(|e| format!("failed to write temp file {}: {e}", tmp_path.display()))?;

    // Windows rename requires target not to exist.
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }

    std::fs::rename(&tmp_path, path)
        .map_err(|e| format!("failed to finalize file {}: {e}", path.display()))?;

    Ok(())
}

/// Moves an unreadable file aside as `<name>.corrupt` so the next write starts clean.
pub(crate) fn quarantine_file(path: &Path) -> Result<PathBuf, String> {
    let file_name = path.file_name().and_then(|v| v.to_str()).unwrap_or("file");
    let target = path.with_file_name(format!("{file_name}.corrupt"));

    if target.exists() {
        let _ = std::fs::remove_file(&target);
    }

    std::fs::rename(path, &target).map_err(|e| {
        format!(
            "failed to move {} -> {}: {e}",
            path.display(),
            target.display()
        )
    })?;
    Ok(target)
}

#[cfg(test)]
pub(crate) mod test_dirs {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TMP_DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

    pub(crate) fn unique_tmp_dir(tag: &str) -> std::path::PathBuf {
        let seq = TMP_DIR_SEQ.fetch_add(1, Ordering::Relaxed);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let mut dir = std::env::temp_dir();
        dir.push(format!(
            "personal_launcher_{tag}_{nanos}_{}_{}",
            std::process::id(),
            seq
        ));
        std::fs::create_dir_all(&dir).expect("create tmp dir");
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::test_dirs::unique_tmp_dir;
    use super::*;

    #[test]
    fn read_optional_to_string_missing_is_none() {
        let dir = unique_tmp_dir("fs");
        let out = read_optional_to_string(&dir.join("missing.json")).expect("read");
        assert!(out.is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn write_file_atomic_creates_parent_and_replaces_content() {
        let dir = unique_tmp_dir("fs");
        let path = dir.join("nested").join("apps.json");

        write_file_atomic(&path, b"[1]").expect("first write");
        write_file_atomic(&path, b"[2]").expect("second write");

        let got = read_optional_to_string(&path).expect("read").expect("exists");
        assert_eq!(got, "[2]");
        assert!(!dir.join("nested").join("apps.json.tmp").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn quarantine_file_moves_content_aside() {
        let dir = unique_tmp_dir("fs");
        let path = dir.join("apps.json");
        std::fs::write(&path, "{not json").expect("write");

        let moved = quarantine_file(&path).expect("quarantine");
        assert!(!path.exists());
        assert_eq!(moved.file_name().and_then(|v| v.to_str()), Some("apps.json.corrupt"));
        assert_eq!(std::fs::read_to_string(&moved).expect("read"), "{not json");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
