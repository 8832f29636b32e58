//! Command-line surface
//!
//! One operation per invocation. Operation flags are plain switches; when
//! several are given the first in this order wins: --install, --diagnose,
//! --backup, --repair-mbr, --repair-grub, --repair-windows-boot, --auto-fix.

use bootfix_common::session::DEFAULT_TARGET_DISK;
use bootfix_common::{Operation, SessionConfig};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bootfix")]
#[command(about = "Bootfix - Boot Repair & Recovery Utility", long_about = None)]
#[command(version = crate::VERSION)]
pub struct Cli {
    /// Install bootfix (backup directory + config file)
    #[arg(long)]
    pub install: bool,

    /// Run boot diagnostics
    #[arg(long)]
    pub diagnose: bool,

    /// Create backup of boot configuration
    #[arg(long)]
    pub backup: bool,

    /// Repair Master Boot Record
    #[arg(long)]
    pub repair_mbr: bool,

    /// Repair GRUB bootloader
    #[arg(long)]
    pub repair_grub: bool,

    /// Repair Windows Boot Manager
    #[arg(long)]
    pub repair_windows_boot: bool,

    /// Automatic diagnosis and repair
    #[arg(long)]
    pub auto_fix: bool,

    /// Target disk
    #[arg(long, default_value = DEFAULT_TARGET_DISK)]
    pub target_disk: String,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Requested operation, first matching flag wins
    pub fn operation(&self) -> Option<Operation> {
        let disk = || self.target_disk.clone();
        if self.install {
            Some(Operation::Install)
        } else if self.diagnose {
            Some(Operation::Diagnose)
        } else if self.backup {
            Some(Operation::Backup)
        } else if self.repair_mbr {
            Some(Operation::RepairMbr { target_disk: disk() })
        } else if self.repair_grub {
            Some(Operation::RepairGrub { target_disk: disk() })
        } else if self.repair_windows_boot {
            Some(Operation::RepairWindowsBoot)
        } else if self.auto_fix {
            Some(Operation::AutoFix)
        } else {
            None
        }
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig::new(self.verbose, self.dry_run).with_target_disk(self.target_disk.clone())
    }
}
