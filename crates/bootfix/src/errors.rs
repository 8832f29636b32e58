//! Exit status for bootfix
//!
//! Any operation that ran exits 0, whatever it reported; details are in
//! the log.

/// Exit code when no operation flag was given
pub const EXIT_NO_OPERATION: i32 = 1;
