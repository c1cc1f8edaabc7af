//! Usage: Launcher core (app list store, status poller, action dispatch, host contract).

pub mod apps;
pub mod host;
pub mod launcher;
pub mod status_poller;

#[cfg(test)]
pub(crate) mod test_host;
