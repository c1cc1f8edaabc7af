//! Usage: Application layer (logging, notices, Tauri-managed state, tray/window lifecycle).

pub mod logging;
pub mod notice;

#[cfg(feature = "desktop")]
pub(crate) mod app_state;
#[cfg(feature = "desktop")]
pub(crate) mod cleanup;
#[cfg(feature = "desktop")]
pub(crate) mod desktop_ui;
#[cfg(feature = "desktop")]
pub(crate) mod events;
#[cfg(feature = "desktop")]
pub(crate) mod resident;
#[cfg(feature = "desktop")]
pub(crate) mod update_prompt;
