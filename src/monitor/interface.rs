// monitor/interface.rs - sysfs-based active interface selection
//
// Heuristic: an interface qualifies when it is up; having an IPv4 route and
// having received traffic each raise its score, and ties go to the highest
// rx byte counter. Loopback and the usual virtual interfaces are skipped.

use crate::report::ErrorSink;
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const SYSFS_NET: &str = "/sys/class/net";
const ROUTE_TABLE: &str = "/proc/net/route";

/// Interface name prefixes that never carry game traffic.
const VIRTUAL_PREFIXES: [&str; 5] = ["lo", "virbr", "veth", "docker", "br-"];

struct Candidate {
    name: String,
    score: u32,
    rx_bytes: u64,
}

/// Pick the interface to drop packets on. A configured override wins when
/// it names an existing interface; otherwise (and when no override is set)
/// the best up interface is auto-detected. `None` when nothing usable is up.
pub fn active_interface(override_name: Option<&str>, on_error: ErrorSink) -> Option<String> {
    if let Some(name) = override_name
        && !name.is_empty()
    {
        if Path::new(SYSFS_NET).join(name).exists() {
            return Some(name.to_string());
        }
        on_error(&format!(
            "Interface '{}' not found, falling back to auto-detect.",
            name
        ));
    }

    auto_detect(Path::new(SYSFS_NET), Path::new(ROUTE_TABLE))
}

fn auto_detect(sysfs_root: &Path, route_table: &Path) -> Option<String> {
    let routed = ipv4_routed_interfaces(route_table);
    let mut best: Option<Candidate> = None;

    for entry in fs::read_dir(sysfs_root).ok()?.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if VIRTUAL_PREFIXES.iter().any(|p| name.starts_with(p)) {
            continue;
        }

        let if_dir = entry.path();
        if !is_up(&if_dir) {
            continue;
        }

        let rx_bytes = rx_bytes(&if_dir);
        let mut score = 2;
        if routed.contains(&name) {
            score += 2;
        }
        if rx_bytes > 0 {
            score += 1;
        }

        let better = match &best {
            None => true,
            Some(b) => score > b.score || (score == b.score && rx_bytes > b.rx_bytes),
        };
        if better {
            best = Some(Candidate {
                name,
                score,
                rx_bytes,
            });
        }
    }

    best.map(|b| {
        debug!(
            "Auto-detected interface {} (score {}, rx_bytes {})",
            b.name, b.score, b.rx_bytes
        );
        b.name
    })
}

fn is_up(if_dir: &Path) -> bool {
    fs::read_to_string(if_dir.join("operstate"))
        .map(|s| s.trim() == "up")
        .unwrap_or(false)
}

fn rx_bytes(if_dir: &Path) -> u64 {
    fs::read_to_string(if_dir.join("statistics/rx_bytes"))
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Interfaces that appear in the kernel IPv4 route table; having a route
/// is how "carries IPv4" is detected without touching socket APIs.
fn ipv4_routed_interfaces(route_table: &Path) -> HashSet<String> {
    let mut routed = HashSet::new();
    if let Ok(content) = fs::read_to_string(route_table) {
        for line in content.lines().skip(1) {
            if let Some(iface) = line.split_whitespace().next() {
                routed.insert(iface.to_string());
            }
        }
    }
    routed
}
