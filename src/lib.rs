//! Personal launcher: app list store, status poller and host contract, plus a Tauri shell
//! behind the `desktop` feature.

mod app;
#[cfg(feature = "desktop")]
mod commands;
mod domain;
mod infra;
mod shared;

pub use app::{logging, notice};
pub use domain::{apps, host, launcher, status_poller};
pub use infra::{app_paths, apps_file, desktop_host, settings, update_check};

#[cfg(feature = "desktop")]
pub(crate) use app::{app_state, resident};
pub(crate) use infra::processes;
pub(crate) use shared::blocking;

#[cfg(feature = "desktop")]
use commands::*;
#[cfg(feature = "desktop")]
use tauri::Manager;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let builder = tauri::Builder::default()
        .manage(app_state::LauncherState::default())
        .manage(resident::ResidentState::default())
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init());

    #[cfg(desktop)]
    let builder = builder.plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
        resident::show_main_window(app);
    }));

    let app = builder
        .on_window_event(resident::on_window_event)
        .setup(|app| {
            let data_dir = match app_paths::app_data_dir(app.handle()) {
                Ok(dir) => Some(dir),
                Err(err) => {
                    eprintln!("app data dir unavailable: {err}");
                    None
                }
            };
            let log_dir = data_dir.as_deref().map(app_paths::logs_dir);
            logging::init(log_dir.as_deref());
            tracing::info!(version = %app.package_info().version, "personal launcher starting");

            let cfg = data_dir
                .as_deref()
                .map(settings::read_or_default)
                .unwrap_or_default();
            app.state::<resident::ResidentState>().apply_settings(&cfg);

            if cfg.tray_enabled {
                if let Err(err) = resident::setup_tray(app.handle()) {
                    tracing::error!(error = %err, "tray setup failed");
                }
            }

            let app_handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                let state = app_handle.state::<app_state::LauncherState>();
                if let Err(err) =
                    app_state::ensure_launcher_ready(app_handle.clone(), state.inner()).await
                {
                    tracing::error!(error = %err, "launcher initialization failed");
                    return;
                }
                app::update_prompt::check_on_startup(app_handle.clone(), cfg).await;
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            apps_list,
            apps_reload,
            app_add_pick,
            app_add_confirm,
            app_delete,
            app_move_up,
            app_move_down,
            app_toggle_checked,
            app_rename,
            app_change_path,
            apps_start_selected,
            apps_stop_selected,
            app_restart,
            apps_status_refresh,
            window_resize,
            settings_get,
            settings_set,
            app_about_get,
            app_exit
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| {
        if let tauri::RunEvent::ExitRequested { api, code, .. } = &event {
            if *code != Some(tauri::RESTART_EXIT_CODE) {
                tracing::info!("exit requested, running cleanup");
                api.prevent_exit();

                let app_handle = app_handle.clone();
                tauri::async_runtime::spawn(async move {
                    app::cleanup::cleanup_before_exit(&app_handle).await;
                    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                    std::process::exit(0);
                });
            }
            return;
        }

        #[cfg(target_os = "macos")]
        if let tauri::RunEvent::Reopen {
            has_visible_windows,
            ..
        } = event
        {
            if !has_visible_windows {
                resident::show_main_window(app_handle);
            }
        }
    });
}
