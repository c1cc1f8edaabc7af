//! Usage: `DesktopUi` backed by Tauri (native file picker, yes/no dialog, main window size).
//!
//! The dialog calls block; `DesktopHost` only calls them from the blocking pool.

use super::resident::MAIN_WINDOW_LABEL;
use crate::desktop_host::DesktopUi;
use tauri::Manager;
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};

pub(crate) struct TauriUi {
    app: tauri::AppHandle,
}

impl TauriUi {
    pub(crate) fn new(app: tauri::AppHandle) -> Self {
        Self { app }
    }
}

impl DesktopUi for TauriUi {
    fn pick_executable(&self) -> Option<String> {
        let builder = self.app.dialog().file().set_title("Select an application");
        #[cfg(windows)]
        let builder = builder.add_filter("Applications", &["exe"]);

        let picked = builder.blocking_pick_file()?;
        match picked.into_path() {
            Ok(path) => Some(path.to_string_lossy().into_owned()),
            Err(err) => {
                tracing::warn!(error = %err, "picked file is not a local path");
                None
            }
        }
    }

    fn confirm(&self, title: &str, question: &str) -> bool {
        self.app
            .dialog()
            .message(question)
            .title(title)
            .kind(MessageDialogKind::Info)
            .buttons(MessageDialogButtons::YesNo)
            .blocking_show()
    }

    fn resize(&self, width: u32, height: u32) -> Result<(), String> {
        let window = self
            .app
            .get_webview_window(MAIN_WINDOW_LABEL)
            .ok_or_else(|| "WINDOW: main window not found".to_string())?;
        window
            .set_size(tauri::LogicalSize::new(f64::from(width), f64::from(height)))
            .map_err(|e| format!("WINDOW: resize failed: {e}"))
    }
}
