// disconnect.rs - privileged single-packet drop to force a quick reconnect
//
// The drop itself needs elevated privileges, so it lives in an external
// helper script run under `sudo -n` or `pkexec`. This module only gathers
// the arguments (pid, interface, server IP) and supervises the helper.

use crate::config::Settings;
use crate::game;
use crate::monitor::{interface, process};
use crate::report::ErrorSink;
use log::{debug, info};
use std::env;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

const HELPER_NAME: &str = "tcpkill_packet.sh";

/// Delay after a successful drop so the OS connection table settles before
/// any follow-up query.
const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Drop one packet of the active game connection. Every missing
/// precondition and helper failure is reported through the sink; the
/// return value is the overall success.
pub fn start_disconnect(settings: &Settings, on_error: ErrorSink) -> bool {
    let pids = process::game_pids();
    let Some(&pid) = pids.first() else {
        on_error("Hearthstone is not running.");
        return false;
    };

    let Some(iface) = interface::active_interface(settings.interface.as_deref(), on_error)
    else {
        on_error("No active network interface found.");
        return false;
    };

    let Some(server_ip) = game::active_server_ip(settings.install_root.as_deref()) else {
        on_error("No active game server found.");
        return false;
    };

    // Prefer sudo when present; validate up front so the passwordless -n
    // run afterwards cannot stall. pkexec brings its own prompt.
    let use_sudo = on_path("sudo");
    if use_sudo {
        match Command::new("sudo").arg("-v").status() {
            Ok(status) if status.success() => {}
            _ => {
                on_error("sudo authentication failed.");
                return false;
            }
        }
    }

    println!("Waiting for packet…");
    println!("Hover over in-game assets to force a packet request if nothing triggers");

    info!(
        "Dropping one packet: pid={} iface={} server={}",
        pid, iface, server_ip
    );
    run_helper(pid, &iface, &server_ip, use_sudo, on_error)
}

/// Run the helper under `sudo -n` or `pkexec`; true on exit code 0.
fn run_helper(pid: u32, iface: &str, server_ip: &str, use_sudo: bool, on_error: ErrorSink) -> bool {
    let Some(script) = helper_script() else {
        on_error("Missing packet-drop helper script.");
        return false;
    };

    let mut cmd = if use_sudo {
        let mut cmd = Command::new("sudo");
        cmd.arg("-n");
        cmd
    } else {
        Command::new("pkexec")
    };
    cmd.arg(&script)
        .arg(pid.to_string())
        .arg(iface)
        .arg(server_ip)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    debug!("Running {:?}", cmd);
    let status = match cmd.status() {
        Ok(status) => status,
        Err(e) => {
            on_error(&format!("Failed to spawn disconnect helper: {}", e));
            return false;
        }
    };
    if !status.success() {
        on_error(&format!("Disconnect helper exited with {}", status));
        return false;
    }

    thread::sleep(SETTLE_DELAY);
    true
}

/// Locate the helper script: env override first, then next to the
/// executable, then the system share directory.
fn helper_script() -> Option<PathBuf> {
    if let Some(path) = env::var_os("PFDC_HELPER_SCRIPT") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        debug!("PFDC_HELPER_SCRIPT points nowhere: {}", path.display());
    }

    if let Ok(exe) = env::current_exe()
        && let Some(dir) = exe.parent()
    {
        let local = dir.join("resources").join(HELPER_NAME);
        if local.exists() {
            return Some(local);
        }
    }

    let system = PathBuf::from("/usr/share/pfdc").join(HELPER_NAME);
    system.exists().then_some(system)
}

/// Whether `name` resolves to a file on PATH.
fn on_path(name: &str) -> bool {
    let Some(path_var) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&path_var).any(|dir| dir.join(name).is_file())
}
