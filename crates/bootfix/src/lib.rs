//! Bootfix - command-line front end for the boot repair core

pub mod banner;
pub mod cli;
pub mod errors;
pub mod logging;

/// Version embedded by build.rs
pub const VERSION: &str = env!("BOOTFIX_VERSION");
