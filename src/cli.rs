use clap::{Arg, Command};

pub fn build_cli() -> Command {
    Command::new("pfdc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Hearthstone network monitor & quick-disconnect tool")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Set the log level (if not provided, no logging will be enabled)")
                .global(true)
                .required(false),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to the settings file")
                .global(true)
                .required(false),
        )
        .subcommand(
            Command::new("status")
                .about("Show current Hearthstone status: PID, interface, logged IPs, active IP"),
        )
        .subcommand(
            Command::new("paths")
                .about("Show discovered Steam library, install and log file paths"),
        )
        .subcommand(
            Command::new("ips").about("Dump all unique server IPs from the latest Hearthstone log"),
        )
        .subcommand(
            Command::new("active").about("Print just the currently active server IP (if any)"),
        )
        .subcommand(
            Command::new("disconnect")
                .visible_alias("dc")
                .about("Drop one packet to force a quick reconnect"),
        )
        .subcommand(Command::new("kill").about("Terminate the Hearthstone process"))
}
