// game/paths.rs - Steam library discovery and log location
//
// Everything here is re-derived on every query. Log directories rotate and
// prefixes change when Proton versions are switched, so nothing is cached.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Log file written by the game's network logger.
pub const NET_LOGGER_FILENAME: &str = "GameNetLogger.log";

/// Install directory inside a Proton prefix.
const INSTALL_SUBDIR: &str = "drive_c/Program Files (x86)/Hearthstone";

/// Candidate steamapps roots: native Steam plus both Flatpak layouts.
fn steamapps_roots(home: &Path) -> Vec<PathBuf> {
    vec![
        home.join(".steam/steam/steamapps"),
        home.join(".local/share/Steam/steamapps"),
        home.join(".var/app/com.valvesoftware.Steam/.local/share/Steam/steamapps"),
        home.join(".var/app/com.valvesoftware.Steam/data/Steam/steamapps"),
    ]
}

/// All Steam library steamapps directories, from the first root that has a
/// libraryfolders.vdf. The root's own steamapps is always included.
pub fn steam_library_paths() -> Vec<PathBuf> {
    let Some(home) = home_dir() else {
        return Vec::new();
    };

    let mut libraries = Vec::new();
    for steamapps in steamapps_roots(&home) {
        let vdf = steamapps.join("libraryfolders.vdf");
        let content = match fs::read_to_string(&vdf) {
            Ok(c) => c,
            Err(_) => continue,
        };

        for line in content.lines() {
            if let Some(path) = parse_vdf_entry(line) {
                libraries.push(PathBuf::from(path).join("steamapps"));
            }
        }
        libraries.push(steamapps);
        // stop after the first valid steamapps folder
        break;
    }

    libraries
}

/// Parse one `"N" "<path>"` entry line from libraryfolders.vdf.
/// Returns the path with surrounding whitespace stripped.
pub(crate) fn parse_vdf_entry(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix('"')?;
    let (index, rest) = rest.split_once('"')?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let rest = rest.trim_start().strip_prefix('"')?;
    let (path, tail) = rest.split_once('"')?;
    if !tail.trim().is_empty() {
        return None;
    }

    let path = path.trim();
    (!path.is_empty()).then_some(path)
}

/// Proton prefixes that contain a game install, across all libraries.
/// More than one shows up when different Proton versions were used.
pub fn game_prefixes() -> Vec<PathBuf> {
    let mut prefixes = Vec::new();
    for steamapps in steam_library_paths() {
        let compat = steamapps.join("compatdata");
        let entries = match fs::read_dir(&compat) {
            Ok(e) => e,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let pfx = entry.path().join("pfx");
            if pfx.join(INSTALL_SUBDIR).is_dir() {
                prefixes.push(pfx);
            }
        }
    }
    prefixes
}

/// The most recently modified prefix, or `None` when none exists.
pub fn recent_game_prefix() -> Option<PathBuf> {
    latest_by_mtime(game_prefixes())
}

/// The game install directory inside the most recent prefix.
pub fn install_dir() -> Option<PathBuf> {
    let install = recent_game_prefix()?.join(INSTALL_SUBDIR);
    install.exists().then_some(install)
}

/// The Logs directory under the install. An `install_override` from the
/// settings file bypasses Steam discovery entirely.
pub fn logs_dir(install_override: Option<&Path>) -> Option<PathBuf> {
    let install = match install_override {
        Some(root) => root.to_path_buf(),
        None => install_dir()?,
    };
    let logs = install.join("Logs");
    logs.is_dir().then_some(logs)
}

/// The most recently modified subdirectory of the logs root, or `None`
/// when the root is absent or has no subdirectories. Ties on equal mtimes
/// are broken arbitrarily.
pub fn latest_log_dir(logs_root: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(logs_root).ok()?;
    let subdirs: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    latest_by_mtime(subdirs)
}

/// The net logger path inside a log directory, only once the game has
/// actually written it. Absence is expected right after joining a game.
pub fn net_logger_path(latest_dir: &Path) -> Option<PathBuf> {
    let path = latest_dir.join(NET_LOGGER_FILENAME);
    path.exists().then_some(path)
}

fn latest_by_mtime(paths: Vec<PathBuf>) -> Option<PathBuf> {
    paths.into_iter().max_by_key(|p| mtime(p))
}

fn mtime(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or_else(|e| {
            debug!("No mtime for {}: {}", path.display(), e);
            SystemTime::UNIX_EPOCH
        })
}

pub(crate) fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}
