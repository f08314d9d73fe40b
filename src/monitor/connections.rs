// monitor/connections.rs - procfs socket enumeration and candidate matching
//
// Connection state is read fresh from /proc on every call. Socket tables
// change between invocations, so nothing here may be cached.

use log::debug;
use std::collections::HashSet;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::{Path, PathBuf};

/// Internet-family tables under /proc/net.
const PROC_NET_TABLES: [&str; 4] = ["tcp", "tcp6", "udp", "udp6"];

/// Remote endpoints of every internet-family socket owned by `pid`.
///
/// Returns `None` when the process no longer exists; callers treat that as
/// "inactive", never as an error.
pub fn remote_addrs_for_pid(pid: u32) -> Option<Vec<IpAddr>> {
    let proc_dir = PathBuf::from(format!("/proc/{}", pid));
    if !proc_dir.is_dir() {
        debug!("PID {} not found", pid);
        return None;
    }

    let inodes = socket_inodes(&proc_dir);
    let mut remotes = Vec::new();
    for table in PROC_NET_TABLES {
        collect_remotes(
            &Path::new("/proc/net").join(table),
            Some(&inodes),
            &mut remotes,
        );
    }
    Some(remotes)
}

/// Remote endpoints of every socket on the system. Broader and less
/// precise than the per-PID variant, used when no PID is known.
pub fn all_remote_addrs() -> Vec<IpAddr> {
    let mut remotes = Vec::new();
    for table in PROC_NET_TABLES {
        collect_remotes(&Path::new("/proc/net").join(table), None, &mut remotes);
    }
    remotes
}

/// First remote address whose textual form is in the candidate set.
///
/// Enumeration order is whatever procfs yields: when several candidates
/// have live connections at once, which one is returned is not guaranteed.
/// Only membership is.
pub fn match_active<I>(candidates: &HashSet<String>, remotes: I) -> Option<String>
where
    I: IntoIterator<Item = IpAddr>,
{
    remotes
        .into_iter()
        .map(|ip| ip.to_string())
        .find(|ip| candidates.contains(ip))
}

/// Socket inodes held open by a process, from its fd table. Fds that
/// vanish mid-scan are simply skipped.
fn socket_inodes(proc_dir: &Path) -> HashSet<u64> {
    let mut inodes = HashSet::new();
    if let Ok(entries) = fs::read_dir(proc_dir.join("fd")) {
        for entry in entries.flatten() {
            if let Ok(link) = fs::read_link(entry.path())
                && let Some(link_str) = link.to_str()
                && let Some(inode) = socket_inode_of_link(link_str)
            {
                inodes.insert(inode);
            }
        }
    }
    inodes
}

/// Parse one /proc/net table, appending remote addresses to `out`. With an
/// inode filter only rows owned by those inodes count; without one, every
/// row does. Unspecified remotes (listening sockets) are skipped.
fn collect_remotes(table: &Path, inode_filter: Option<&HashSet<u64>>, out: &mut Vec<IpAddr>) {
    let content = match fs::read_to_string(table) {
        Ok(c) => c,
        Err(_) => return, // table might not exist (no IPv6, ...)
    };

    for line in content.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 10 {
            continue;
        }

        if let Some(filter) = inode_filter {
            match fields[9].parse::<u64>() {
                Ok(inode) if filter.contains(&inode) => {}
                _ => continue,
            }
        }

        if let Some(remote) = parse_hex_endpoint(fields[2])
            && !remote.is_unspecified()
        {
            out.push(remote);
        }
    }
}

/// Decode the kernel's `HEXADDR:HEXPORT` endpoint notation. IPv4 is one
/// little-endian u32; IPv6 is four little-endian u32 chunks.
fn parse_hex_endpoint(field: &str) -> Option<IpAddr> {
    let (ip_hex, _port_hex) = field.split_once(':')?;

    match ip_hex.len() {
        8 => {
            let raw = u32::from_str_radix(ip_hex, 16).ok()?;
            Some(IpAddr::V4(Ipv4Addr::from(raw.to_le_bytes())))
        }
        32 => {
            let mut bytes = [0u8; 16];
            for (i, chunk) in bytes.chunks_exact_mut(4).enumerate() {
                let raw = u32::from_str_radix(&ip_hex[i * 8..(i + 1) * 8], 16).ok()?;
                chunk.copy_from_slice(&raw.to_le_bytes());
            }
            Some(IpAddr::V6(Ipv6Addr::from(bytes)))
        }
        _ => None,
    }
}

fn socket_inode_of_link(link: &str) -> Option<u64> {
    link.strip_prefix("socket:[")?
        .strip_suffix(']')?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn matches_candidate_member() {
        let candidates: HashSet<String> = ["1.2.3.4".to_string()].into_iter().collect();
        let remotes = vec!["9.9.9.9".parse().unwrap(), "1.2.3.4".parse().unwrap()];
        assert_eq!(match_active(&candidates, remotes), Some("1.2.3.4".to_string()));
    }

    #[test]
    fn no_overlap_is_no_match() {
        let candidates: HashSet<String> = ["1.2.3.4".to_string()].into_iter().collect();
        let remotes: Vec<IpAddr> = vec!["5.6.7.8".parse().unwrap()];
        assert_eq!(match_active(&candidates, remotes), None);
    }

    #[test]
    fn missing_pid_is_inactive_not_error() {
        // PID u32::MAX is far above any real pid_max.
        assert_eq!(remote_addrs_for_pid(u32::MAX), None);
    }

    #[test]
    fn own_process_is_enumerable() {
        let remotes = remote_addrs_for_pid(std::process::id());
        assert!(remotes.is_some(), "own /proc entry must exist");
    }

    #[test]
    fn hex_endpoint_decoding() {
        assert_eq!(
            parse_hex_endpoint("0100007F:0050"),
            Some("127.0.0.1".parse().unwrap())
        );
        assert_eq!(
            parse_hex_endpoint("0101A8C0:0E8A"),
            Some("192.168.1.1".parse().unwrap())
        );
        assert_eq!(
            parse_hex_endpoint("00000000000000000000000001000000:1F90"),
            Some("::1".parse().unwrap())
        );
        assert_eq!(parse_hex_endpoint("0100007F"), None);
        assert_eq!(parse_hex_endpoint("XYZ:0050"), None);
    }

    #[test]
    fn socket_link_parsing() {
        assert_eq!(socket_inode_of_link("socket:[12345]"), Some(12345));
        assert_eq!(socket_inode_of_link("pipe:[12345]"), None);
        assert_eq!(socket_inode_of_link("/dev/null"), None);
    }

    #[test]
    fn table_parsing_respects_inode_filter() {
        let mut table = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            table,
            "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode"
        )
        .unwrap();
        writeln!(
            table,
            "   0: 0100007F:A000 0200007F:0050 01 00000000:00000000 00:00000000 00000000  1000        0 111 1 0 20 0"
        )
        .unwrap();
        writeln!(
            table,
            "   1: 0100007F:A001 0300007F:0050 01 00000000:00000000 00:00000000 00000000  1000        0 222 1 0 20 0"
        )
        .unwrap();

        let mut all = Vec::new();
        collect_remotes(table.path(), None, &mut all);
        assert_eq!(all.len(), 2);

        let filter: HashSet<u64> = [222].into_iter().collect();
        let mut filtered = Vec::new();
        collect_remotes(table.path(), Some(&filter), &mut filtered);
        assert_eq!(filtered, vec!["127.0.0.3".parse::<IpAddr>().unwrap()]);
    }
}
