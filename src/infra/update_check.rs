//! Usage: Startup check against a published `version.json` manifest, and download of the
//! advertised release asset.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);
const DOWNLOAD_CHUNK_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateManifest {
    pub version: String,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub changelog: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateInfo {
    pub version: String,
    pub download_url: String,
    pub release_url: String,
    pub changelog: String,
}

fn version_parts(version: &str) -> Vec<u64> {
    version
        .trim()
        .trim_start_matches(['v', 'V'])
        .split('.')
        .map(|part| {
            let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().unwrap_or(0)
        })
        .collect()
}

/// Dotted numeric comparison; missing components count as zero (`1.2` == `1.2.0`).
pub fn is_newer(candidate: &str, current: &str) -> bool {
    let a = version_parts(candidate);
    let b = version_parts(current);
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Greater => return true,
            Ordering::Less => return false,
            Ordering::Equal => {}
        }
    }
    false
}

/// Release page for a GitHub-style asset link (`.../releases/download/<tag>/<file>`).
pub fn release_page_url(download_url: &str) -> String {
    match download_url.rfind("/download/") {
        Some(idx) => download_url[..idx].to_string(),
        None => download_url.to_string(),
    }
}

pub fn evaluate(manifest: UpdateManifest, current: &str) -> Option<UpdateInfo> {
    if !is_newer(&manifest.version, current) {
        return None;
    }
    let release_url = release_page_url(&manifest.download_url);
    Some(UpdateInfo {
        version: manifest.version.trim().to_string(),
        download_url: manifest.download_url,
        release_url,
        changelog: manifest.changelog,
    })
}

pub async fn check(
    client: &reqwest::Client,
    manifest_url: &str,
    current: &str,
) -> Result<Option<UpdateInfo>, String> {
    let resp = client
        .get(manifest_url)
        .timeout(CHECK_TIMEOUT)
        .send()
        .await
        .map_err(|e| format!("UPDATE_CHECK: request failed: {e}"))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(format!("UPDATE_CHECK: unexpected status {status}"));
    }

    let body = resp
        .bytes()
        .await
        .map_err(|e| format!("UPDATE_CHECK: failed to read body: {e}"))?;
    let manifest: UpdateManifest = serde_json::from_slice(&body)
        .map_err(|e| format!("UPDATE_CHECK: invalid version.json: {e}"))?;

    Ok(evaluate(manifest, current))
}

/// Local file name for a download link: the last path segment, without query or fragment.
pub fn asset_file_name(download_url: &str) -> Option<String> {
    let without_suffix = download_url.split(['?', '#']).next().unwrap_or_default();
    let (scheme_and_host, path) = without_suffix.split_once("://")?;
    if scheme_and_host.is_empty() {
        return None;
    }
    let (_, path) = path.split_once('/')?;
    let name: String = path
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| match c {
            '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let name = name.trim().trim_end_matches('.');
    (!name.is_empty()).then(|| name.to_string())
}

fn part_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    target.with_file_name(name)
}

/// Streams the release asset into `dest_dir` and returns the saved path.
///
/// The body is written to `<name>.part` and renamed once complete; a failed download leaves
/// nothing behind.
pub async fn download(
    client: &reqwest::Client,
    download_url: &str,
    dest_dir: &Path,
) -> Result<PathBuf, String> {
    if !download_url.starts_with("https://") && !download_url.starts_with("http://") {
        return Err(format!("UPDATE_CHECK: unsupported download url: {download_url}"));
    }
    let name = asset_file_name(download_url)
        .ok_or_else(|| format!("UPDATE_CHECK: download url has no file name: {download_url}"))?;

    let mut resp = client
        .get(download_url)
        .send()
        .await
        .map_err(|e| format!("UPDATE_CHECK: download request failed: {e}"))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(format!("UPDATE_CHECK: download returned status {status}"));
    }

    tokio::fs::create_dir_all(dest_dir)
        .await
        .map_err(|e| format!("UPDATE_CHECK: failed to create {}: {e}", dest_dir.display()))?;
    let target = dest_dir.join(name);
    let part = part_path(&target);

    let written = write_body(&mut resp, &part).await;
    let written = match written {
        Ok(bytes) => bytes,
        Err(err) => {
            let _ = tokio::fs::remove_file(&part).await;
            return Err(err);
        }
    };
    if let Err(e) = tokio::fs::rename(&part, &target).await {
        let _ = tokio::fs::remove_file(&part).await;
        return Err(format!(
            "UPDATE_CHECK: failed to move download to {}: {e}",
            target.display()
        ));
    }

    tracing::info!(path = %target.display(), bytes = written, "update downloaded");
    Ok(target)
}

async fn write_body(resp: &mut reqwest::Response, part: &Path) -> Result<u64, String> {
    let mut file = tokio::fs::File::create(part)
        .await
        .map_err(|e| format!("UPDATE_CHECK: failed to create {}: {e}", part.display()))?;
    let mut written = 0u64;
    loop {
        let chunk = match tokio::time::timeout(DOWNLOAD_CHUNK_TIMEOUT, resp.chunk()).await {
            Ok(Ok(Some(chunk))) => chunk,
            Ok(Ok(None)) => break,
            Ok(Err(e)) => return Err(format!("UPDATE_CHECK: download interrupted: {e}")),
            Err(_) => return Err("UPDATE_CHECK: download stalled".to_string()),
        };
        file.write_all(&chunk)
            .await
            .map_err(|e| format!("UPDATE_CHECK: failed to write {}: {e}", part.display()))?;
        written += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| format!("UPDATE_CHECK: failed to write {}: {e}", part.display()))?;
    Ok(written)
}
