//! Notice (user-facing notification) module.
//!
//! Usage:
//! - Controller: user-initiated actions return a `NoticeEventPayload` describing what to show.
//! - Desktop shell: `notice::emit(app, payload)` forwards it to the webview, which shows it as a
//!   blocking alert.

pub const NOTICE_EVENT_NAME: &str = "notice:notify";

const NOTICE_PREFIX: &str = "Personal Launcher";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NoticeEventPayload {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
}

fn default_title(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "Info",
        NoticeLevel::Success => "Done",
        NoticeLevel::Warning => "Warning",
        NoticeLevel::Error => "Error",
    }
}

fn normalize_optional_title(title: Option<String>) -> Option<String> {
    let title = title?;
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn format_title(level: NoticeLevel, title: Option<String>) -> String {
    let title = normalize_optional_title(title).unwrap_or_else(|| default_title(level).to_string());
    format!("{NOTICE_PREFIX} · {title}")
}

pub fn build(level: NoticeLevel, title: Option<String>, body: String) -> NoticeEventPayload {
    NoticeEventPayload {
        level,
        title: format_title(level, title),
        body,
    }
}

#[cfg(feature = "desktop")]
pub fn emit(app: &tauri::AppHandle, payload: NoticeEventPayload) -> Result<(), String> {
    use tauri::Emitter;

    app.emit(NOTICE_EVENT_NAME, payload)
        .map_err(|e| format!("NOTICE_EMIT: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_prefixes_explicit_title() {
        let payload = build(NoticeLevel::Error, Some(" Start failed ".to_string()), "x".to_string());
        assert_eq!(payload.title, "Personal Launcher · Start failed");
        assert_eq!(payload.body, "x");
    }

    #[test]
    fn build_uses_level_title_when_missing_or_blank() {
        let payload = build(NoticeLevel::Info, Some("   ".to_string()), String::new());
        assert_eq!(payload.title, "Personal Launcher · Info");
        let payload = build(NoticeLevel::Warning, None, String::new());
        assert_eq!(payload.title, "Personal Launcher · Warning");
    }

    #[test]
    fn level_serializes_lowercase() {
        let json = serde_json::to_string(&NoticeLevel::Success).expect("serialize");
        assert_eq!(json, "\"success\"");
    }
}
