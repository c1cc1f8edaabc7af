//! Usage: Desktop resident mode (tray icon + close-to-tray window lifecycle).

use crate::{app_paths, blocking, settings};
use std::sync::atomic::{AtomicBool, Ordering};
use tauri::menu::{Menu, MenuItem, PredefinedMenuItem};
use tauri::tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent};
use tauri::Manager;
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
const TRAY_ID: &str = "main-tray";
const TRAY_MENU_OPEN_ID: &str = "tray.open";
const TRAY_MENU_QUIT_ID: &str = "tray.quit";
const CLOSE_NOTICE_TITLE: &str = "Personal Launcher";
const CLOSE_NOTICE_BODY: &str =
    "Personal Launcher keeps running in the system tray. Use the tray menu to quit.";

pub struct ResidentState {
    tray_enabled: AtomicBool,
    close_notice_shown: AtomicBool,
}

impl Default for ResidentState {
    fn default() -> Self {
        Self {
            tray_enabled: AtomicBool::new(true),
            close_notice_shown: AtomicBool::new(false),
        }
    }
}

impl ResidentState {
    pub fn apply_settings(&self, cfg: &settings::LauncherSettings) {
        self.tray_enabled.store(cfg.tray_enabled, Ordering::Relaxed);
        self.close_notice_shown
            .store(cfg.hide_close_notification, Ordering::Relaxed);
    }

    pub fn tray_enabled(&self) -> bool {
        self.tray_enabled.load(Ordering::Relaxed)
    }

    /// True exactly once, the first time the window is closed to the tray.
    fn claim_close_notice(&self) -> bool {
        !self.close_notice_shown.swap(true, Ordering::Relaxed)
    }
}

pub fn setup_tray(app: &tauri::AppHandle) -> Result<(), String> {
    let open_item = MenuItem::with_id(app, TRAY_MENU_OPEN_ID, "Open", true, None::<&str>)
        .map_err(|e| format!("failed to create tray open menu item: {e}"))?;
    let quit_item = MenuItem::with_id(app, TRAY_MENU_QUIT_ID, "Quit", true, None::<&str>)
        .map_err(|e| format!("failed to create tray quit menu item: {e}"))?;
    let separator = PredefinedMenuItem::separator(app)
        .map_err(|e| format!("failed to create tray menu separator: {e}"))?;

    let menu = Menu::with_items(app, &[&open_item, &separator, &quit_item])
        .map_err(|e| format!("failed to create tray menu: {e}"))?;

    let open_id = open_item.id().clone();
    let quit_id = quit_item.id().clone();

    let icon = tauri::image::Image::from_bytes(include_bytes!("../../icons/32x32.png"))
        .map_err(|e| format!("failed to load tray icon: {e}"))?;

    TrayIconBuilder::with_id(TRAY_ID)
        .icon(icon)
        .tooltip("Personal Launcher")
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(move |app, event| {
            if event.id == quit_id {
                app.exit(0);
                return;
            }
            if event.id == open_id {
                show_main_window(app);
            }
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button,
                button_state,
                ..
            } = event
            {
                if button == MouseButton::Left && button_state == MouseButtonState::Up {
                    show_main_window(tray.app_handle());
                }
            }
        })
        .build(app)
        .map_err(|e| format!("failed to build tray icon: {e}"))?;

    Ok(())
}

pub fn show_main_window(app: &tauri::AppHandle) {
    let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        return;
    };

    let _ = window.show();
    let _ = window.unminimize();
    let _ = window.set_focus();
}

pub fn on_window_event(window: &tauri::Window, event: &tauri::WindowEvent) {
    if window.label() != MAIN_WINDOW_LABEL {
        return;
    }

    let tauri::WindowEvent::CloseRequested { api, .. } = event else {
        return;
    };

    api.prevent_close();

    let resident = window.state::<ResidentState>();
    if !resident.tray_enabled() {
        let _ = window.minimize();
        return;
    }

    let _ = window.hide();
    if resident.claim_close_notice() {
        show_close_notice(window.app_handle());
    }
}

fn show_close_notice(app: &tauri::AppHandle) {
    app.dialog()
        .message(CLOSE_NOTICE_BODY)
        .title(CLOSE_NOTICE_TITLE)
        .kind(MessageDialogKind::Info)
        .show(|_| {});

    let app = app.clone();
    tauri::async_runtime::spawn(async move {
        let persisted = blocking::run("resident_persist_close_notice", move || {
            let data_dir = app_paths::app_data_dir(&app)?;
            let mut cfg = settings::read(&data_dir)?;
            cfg.hide_close_notification = true;
            settings::write(&data_dir, &cfg).map(|_| ())
        })
        .await;
        if let Err(err) = persisted {
            tracing::warn!(error = %err, "failed to persist close notice flag");
        }
    });
}
