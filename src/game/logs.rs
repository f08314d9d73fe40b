// game/logs.rs - server IP extraction from GameNetLogger.log

use log::debug;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Marker preceding a server address in the net logger output.
pub const SERVER_MARKER: &str = "Network.GotoGameServe() - address=";

/// Scan the whole log file and return every distinct server IP seen.
///
/// Returns `None` when the file cannot be opened, `Some` (possibly empty)
/// otherwise. The log is append-only, so every line is scanned; earlier
/// connections are still relevant history.
pub fn server_ips_from_log(path: &Path) -> Option<HashSet<String>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            debug!("Cannot open {}: {}", path.display(), e);
            return None;
        }
    };

    let mut ips = HashSet::new();
    for line in BufReader::new(file).lines() {
        // A torn read mid-file degrades to a partial result instead of
        // dropping everything collected so far.
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                debug!("Read error in {}: {}", path.display(), e);
                continue;
            }
        };
        collect_ips(&line, &mut ips);
    }

    Some(ips)
}

/// Collect every marker-prefixed address token in one line.
fn collect_ips(line: &str, out: &mut HashSet<String>) {
    let mut rest = line;
    while let Some(pos) = rest.find(SERVER_MARKER) {
        rest = &rest[pos + SERVER_MARKER.len()..];
        if let Some(ip) = ipv4_shaped_prefix(rest.trim_start()) {
            out.insert(ip.to_string());
        }
    }
}

/// Match a leading IPv4-shaped token: four groups of 1-3 digits separated
/// by dots. Octet ranges are deliberately not validated; the log is trusted
/// for shape only, and out-of-range tokens are kept as the game wrote them.
fn ipv4_shaped_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut idx = 0;

    for group in 0..4 {
        if group > 0 {
            if bytes.get(idx) != Some(&b'.') {
                return None;
            }
            idx += 1;
        }

        let start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() && idx - start < 3 {
            idx += 1;
        }
        if idx == start {
            return None;
        }
        // Interior groups must stop at a dot; a fourth digit means this is
        // not an address-shaped token at all.
        if group < 3 && bytes.get(idx).is_some_and(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    Some(&s[..idx])
}
