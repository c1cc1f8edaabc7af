//! Usage: Infrastructure adapters (filesystem paths, persistence, OS processes, update check).

pub mod app_paths;
pub mod apps_file;
pub mod desktop_host;
pub(crate) mod processes;
pub mod settings;
pub mod update_check;
