//! Usage: Tauri command handlers exposed to the webview.

mod app;
mod apps;
mod settings;

pub(crate) use app::*;
pub(crate) use apps::*;
pub(crate) use settings::*;
