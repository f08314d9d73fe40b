// game/mod.rs - the log-to-live-connection pipeline
//
// Data flow: locate the newest log directory, extract candidate server IPs
// from it, then intersect them with the game's live sockets.

pub mod logconfig;
pub mod logs;
pub mod paths;

use crate::monitor::{connections, process};
use log::debug;
use std::collections::HashSet;
use std::path::Path;

/// Outcome of an active-server query. The three cases stay distinct so
/// callers other than the CLI can tell "nothing matched" apart from
/// "nothing to match against".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerStatus {
    /// A logged server IP with a live connection.
    Active(String),
    /// Candidates were found in the log, but none is connected.
    NoActiveConnection,
    /// No log, no candidates, or no such process.
    NoData,
}

impl ServerStatus {
    pub fn active_ip(&self) -> Option<&str> {
        match self {
            ServerStatus::Active(ip) => Some(ip),
            _ => None,
        }
    }
}

/// Every server IP recorded in the newest net logger file under
/// `logs_root`. `None` when the locator or the log itself has no data yet.
pub fn logged_server_ips_in(logs_root: &Path) -> Option<HashSet<String>> {
    let latest = paths::latest_log_dir(logs_root)?;
    let log_file = paths::net_logger_path(&latest)?;
    logs::server_ips_from_log(&log_file)
}

/// Discovery-driven variant used by the CLI.
pub fn logged_server_ips(install_override: Option<&Path>) -> Option<HashSet<String>> {
    let logs_root = paths::logs_dir(install_override)?;
    logged_server_ips_in(&logs_root)
}

/// Resolve the active server for a logs root and an optional PID. With a
/// PID, only that process's sockets count; without one, the whole system
/// table is searched.
pub fn active_server_status(logs_root: &Path, pid: Option<u32>) -> ServerStatus {
    let candidates = match logged_server_ips_in(logs_root) {
        Some(ips) if !ips.is_empty() => ips,
        _ => return ServerStatus::NoData,
    };

    let remotes = match pid {
        Some(pid) => match connections::remote_addrs_for_pid(pid) {
            Some(remotes) => remotes,
            None => {
                debug!("PID {} no longer exists", pid);
                return ServerStatus::NoData;
            }
        },
        None => connections::all_remote_addrs(),
    };

    match connections::match_active(&candidates, remotes) {
        Some(ip) => ServerStatus::Active(ip),
        None => ServerStatus::NoActiveConnection,
    }
}

/// Active server IP for the discovered install and the running game
/// process; the convenience form the CLI and the disconnect path use.
pub fn active_server_ip(install_override: Option<&Path>) -> Option<String> {
    let pid = process::game_pids().into_iter().next()?;
    let logs_root = paths::logs_dir(install_override)?;
    match active_server_status(&logs_root, Some(pid)) {
        ServerStatus::Active(ip) => Some(ip),
        _ => None,
    }
}
