//! pfdc library
//!
//! Watches the Hearthstone game process's server connections by scanning its
//! network log for server addresses and correlating them against live procfs
//! socket state. Can force a quick reconnect by dropping a single packet
//! through a privileged helper script.

pub mod cli;
pub mod config;
pub mod disconnect;
pub mod game;
pub mod monitor;
pub mod report;
