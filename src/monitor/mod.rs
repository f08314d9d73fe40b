// monitor/mod.rs - live OS state inspection
//
// Everything under here reads procfs/sysfs fresh on each call; there is no
// retained state between queries.

pub mod connections;
pub mod interface;
pub mod process;
