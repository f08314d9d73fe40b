//! Integration tests for the log-to-live-connection pipeline.
//!
//! The log side is driven by real files in a temp directory; the live side
//! uses this test process's own loopback sockets, so the whole pipeline
//! runs against genuine procfs state.

use std::fs;
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::Duration;

use pfdc::game::{self, ServerStatus};
use pfdc::monitor::connections;

const MARKER: &str = "Network.GotoGameServe() - address=";

/// Build `<root>/<dir>/GameNetLogger.log` containing one marker line per IP.
fn write_net_log(root: &Path, dir: &str, ips: &[&str]) -> PathBuf {
    let log_dir = root.join(dir);
    fs::create_dir_all(&log_dir).expect("log dir");
    let mut content = String::from("Initializing network subsystem\n");
    for ip in ips {
        content.push_str(&format!("{}{}, port=3724\n", MARKER, ip));
    }
    let log_file = log_dir.join("GameNetLogger.log");
    fs::write(&log_file, content).expect("log file");
    log_file
}

#[test]
fn pipeline_extracts_from_newest_directory() {
    let root = tempfile::tempdir().expect("temp dir");

    write_net_log(root.path(), "Logs_old", &["10.0.0.1"]);
    sleep(Duration::from_millis(20));
    write_net_log(root.path(), "Logs_new", &["100.1.1.1", "100.1.1.2"]);

    let ips = game::logged_server_ips_in(root.path()).expect("log data");
    assert_eq!(ips.len(), 2);
    assert!(ips.contains("100.1.1.1"));
    assert!(ips.contains("100.1.1.2"));
    assert!(!ips.contains("10.0.0.1"), "older directory must be ignored");
}

#[test]
fn missing_log_root_is_no_data() {
    let root = tempfile::tempdir().expect("temp dir");
    let status = game::active_server_status(&root.path().join("gone"), None);
    assert_eq!(status, ServerStatus::NoData);
}

#[test]
fn log_without_candidates_is_no_data() {
    let root = tempfile::tempdir().expect("temp dir");
    write_net_log(root.path(), "Logs_empty", &[]);

    let status = game::active_server_status(root.path(), None);
    assert_eq!(status, ServerStatus::NoData);
}

#[test]
fn candidates_without_connection_is_no_active_connection() {
    let root = tempfile::tempdir().expect("temp dir");
    // TEST-NET-3 addresses are never actually connected.
    write_net_log(root.path(), "Logs", &["203.0.113.7", "203.0.113.8"]);

    let status = game::active_server_status(root.path(), Some(std::process::id()));
    assert_eq!(status, ServerStatus::NoActiveConnection);
}

#[test]
fn vanished_pid_is_no_data_not_no_active_connection() {
    let root = tempfile::tempdir().expect("temp dir");
    write_net_log(root.path(), "Logs", &["203.0.113.7"]);

    let status = game::active_server_status(root.path(), Some(i32::MAX as u32));
    assert_eq!(status, ServerStatus::NoData);
}

#[test]
fn live_loopback_connection_is_detected_end_to_end() {
    // A real socket owned by this process stands in for the game's
    // connection; its remote address is loopback.
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let _client = TcpStream::connect(addr).expect("connect");
    let _server = listener.accept().expect("accept");

    let root = tempfile::tempdir().expect("temp dir");
    write_net_log(root.path(), "Logs", &["127.0.0.1", "203.0.113.7"]);

    let status = game::active_server_status(root.path(), Some(std::process::id()));
    assert_eq!(status, ServerStatus::Active("127.0.0.1".to_string()));
}

#[test]
fn per_pid_enumeration_sees_own_sockets() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let _client = TcpStream::connect(addr).expect("connect");
    let _server = listener.accept().expect("accept");

    let remotes = connections::remote_addrs_for_pid(std::process::id())
        .expect("own process exists");
    assert!(
        remotes.iter().any(|ip| ip.to_string() == "127.0.0.1"),
        "loopback connection should be visible, got {:?}",
        remotes
    );
}
