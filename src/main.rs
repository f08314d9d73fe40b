use anyhow::Result;
use log::{LevelFilter, info};
use simplelog::{Config as LogConfig, WriteLogger};
use std::fs::{self, File};
use std::path::Path;
use std::process::ExitCode;
use std::str::FromStr;

use pfdc::cli::build_cli;
use pfdc::config::Settings;
use pfdc::disconnect;
use pfdc::game::{self, ServerStatus, logconfig, paths};
use pfdc::monitor::{interface, process};
use pfdc::report::console_sink;

fn main() -> ExitCode {
    let matches = build_cli().get_matches();

    // Set up logging only if log-level was provided
    if let Some(level) = matches.get_one::<String>("log-level") {
        match LevelFilter::from_str(level) {
            Ok(level) => {
                if let Err(e) = setup_logging(level) {
                    eprintln!("Failed to set up logging: {}", e);
                }
            }
            Err(_) => eprintln!("Unknown log level '{}', logging disabled", level),
        }
    }

    info!("Starting pfdc");

    let settings = match Settings::load(matches.get_one::<String>("config").map(String::as_str)) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {}", e);
            Settings::default()
        }
    };

    match matches.subcommand() {
        Some(("status", _)) => cmd_status(&settings),
        Some(("paths", _)) => cmd_paths(&settings),
        Some(("ips", _)) => cmd_ips(&settings),
        Some(("active", _)) => cmd_active(&settings),
        Some(("disconnect", _)) => cmd_disconnect(&settings),
        Some(("kill", _)) => cmd_kill(),
        _ => unreachable!("subcommand is required"),
    }
}

fn setup_logging(level: LevelFilter) -> Result<()> {
    // Create logs directory if it doesn't exist
    let log_dir = Path::new("logs");
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)?;
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let log_file_path = log_dir.join(format!("pfdc_{}.log", timestamp));

    WriteLogger::init(level, LogConfig::default(), File::create(log_file_path)?)?;

    Ok(())
}

/// Show current Hearthstone status: PID, interface, logged IPs, active IP.
fn cmd_status(settings: &Settings) -> ExitCode {
    let pids = process::game_pids();
    match pids.as_slice() {
        [] => println!("PID: <not running>"),
        [pid] => println!("PID: {}", pid),
        many => println!(
            "PID: {} instances of Hearthstone found, close any extras or pfdc may not function.",
            many.len()
        ),
    }

    let iface = interface::active_interface(settings.interface.as_deref(), &console_sink);
    println!("Interface: {}", iface.as_deref().unwrap_or("<none>"));

    match game::logged_server_ips(settings.install_root.as_deref()) {
        Some(ips) if !ips.is_empty() => {
            println!("IPs seen in log file: {}", sorted_joined(&ips));
        }
        _ => println!("IPs seen in log file: <none>"),
    }

    let active = game::active_server_ip(settings.install_root.as_deref());
    println!("Active IP: {}", active.as_deref().unwrap_or("<none>"));

    ExitCode::SUCCESS
}

/// Show discovered Steam library, install and log file paths.
fn cmd_paths(settings: &Settings) -> ExitCode {
    let libraries = paths::steam_library_paths();
    if libraries.is_empty() {
        println!("Steam library paths: <none>");
    } else {
        println!("Steam library paths:");
        for lib in &libraries {
            println!("  {}", lib.display());
        }
    }

    let install = paths::install_dir();
    print_path("Hearthstone path", install.as_deref());

    let log_config =
        paths::recent_game_prefix().and_then(|pfx| logconfig::ensure_log_config(&pfx));
    print_path("log.config path", log_config.as_deref());

    let logs = paths::logs_dir(settings.install_root.as_deref());
    print_path("Logs path", logs.as_deref());

    let latest = logs.as_deref().and_then(paths::latest_log_dir);
    print_path("Latest log directory", latest.as_deref());

    let net_log = latest.as_deref().and_then(paths::net_logger_path);
    print_path("GameNetLogger.log path", net_log.as_deref());

    ExitCode::SUCCESS
}

/// Dump all unique server IPs from the latest log.
fn cmd_ips(settings: &Settings) -> ExitCode {
    match game::logged_server_ips(settings.install_root.as_deref()) {
        Some(ips) if !ips.is_empty() => {
            let mut sorted: Vec<&str> = ips.iter().map(String::as_str).collect();
            sorted.sort_unstable();
            for ip in sorted {
                println!("{}", ip);
            }
        }
        _ => println!("No IPs found in logs."),
    }
    ExitCode::SUCCESS
}

/// Print just the currently active server IP (if any).
fn cmd_active(settings: &Settings) -> ExitCode {
    let pids = process::game_pids();
    if pids.len() > 1 {
        println!(
            "{} instances of Hearthstone found, close any extras and try again.",
            pids.len()
        );
    }

    let status = match (pids.first(), paths::logs_dir(settings.install_root.as_deref())) {
        (Some(&pid), Some(logs_root)) => game::active_server_status(&logs_root, Some(pid)),
        _ => ServerStatus::NoData,
    };

    match status {
        ServerStatus::Active(ip) => println!("{}", ip),
        // The default CLI collapses the two negative cases; the library
        // API keeps them apart for other frontends.
        ServerStatus::NoActiveConnection | ServerStatus::NoData => {
            println!("No active connection.")
        }
    }
    ExitCode::SUCCESS
}

/// Drop one packet to force a quick reconnect.
fn cmd_disconnect(settings: &Settings) -> ExitCode {
    let pids = process::game_pids();
    if pids.len() > 1 {
        println!(
            "{} instances of Hearthstone found, close any extras and try again.",
            pids.len()
        );
        return ExitCode::FAILURE;
    }

    if disconnect::start_disconnect(settings, &|msg| println!("{}", msg)) {
        println!("Disconnect triggered");
    } else {
        println!("Can't trigger disconnect");
    }
    ExitCode::SUCCESS
}

/// Terminate the Hearthstone process.
fn cmd_kill() -> ExitCode {
    let pids = process::game_pids();
    if process::terminate(&pids, &|msg| println!("{}", msg)) {
        println!("All instances of Hearthstone terminated.");
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn sorted_joined(ips: &std::collections::HashSet<String>) -> String {
    let mut sorted: Vec<&str> = ips.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.join(", ")
}

fn print_path(label: &str, path: Option<&Path>) {
    match path {
        Some(path) => println!("{}: {}", label, path.display()),
        None => println!("{}: <none>", label),
    }
}
