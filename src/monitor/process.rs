// monitor/process.rs - procfs process listing for the game executable

use crate::report::ErrorSink;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Executable name the process table is searched for.
pub const GAME_PROCESS_NAME: &str = "hearthstone.exe";

/// PIDs of every running game process, by case-insensitive substring match
/// on the executable name. Empty when the game is not running.
pub fn game_pids() -> Vec<u32> {
    pids_matching(GAME_PROCESS_NAME)
}

fn pids_matching(needle: &str) -> Vec<u32> {
    let mut pids = Vec::new();
    let entries = match fs::read_dir("/proc") {
        Ok(e) => e,
        Err(e) => {
            debug!("Cannot read /proc: {}", e);
            return pids;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if let Some(pid_str) = path.file_name().and_then(|s| s.to_str())
            && let Ok(pid) = pid_str.parse::<u32>()
            && pid != 0
            && let Some(name) = process_name(&path)
            && name.to_lowercase().contains(needle)
        {
            pids.push(pid);
        }
    }
    pids
}

/// Executable name for a /proc entry: argv[0] basename when available
/// (comm truncates to 15 bytes, which cuts "Hearthstone.exe" short),
/// falling back to comm. Processes that exit mid-scan yield `None`.
fn process_name(proc_dir: &Path) -> Option<String> {
    if let Ok(cmdline) = fs::read(proc_dir.join("cmdline"))
        && let Some(argv0) = cmdline.split(|b| *b == 0).next()
        && !argv0.is_empty()
    {
        let argv0 = String::from_utf8_lossy(argv0);
        // Wine processes carry Windows-style paths in argv[0].
        let base = argv0.rsplit(['/', '\\']).next().unwrap_or(argv0.as_ref());
        return Some(base.to_string());
    }

    fs::read_to_string(proc_dir.join("comm"))
        .ok()
        .map(|s| s.trim().to_string())
}

/// Send SIGTERM to each PID. Returns true only when every signal was
/// delivered; failures go to the sink and do not stop the loop.
pub fn terminate(pids: &[u32], on_error: ErrorSink) -> bool {
    if pids.is_empty() {
        on_error("Hearthstone is not running.");
        return false;
    }

    let mut all_ok = true;
    for &pid in pids {
        // SAFETY: kill(2) with a valid signal only affects process
        // lifetime; no memory is touched.
        let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
        if rc != 0 {
            on_error(&format!(
                "Failed to terminate PID {}: {}",
                pid,
                std::io::Error::last_os_error()
            ));
            all_ok = false;
        } else {
            info!("Sent SIGTERM to PID {}", pid);
        }
    }
    all_ok
}
