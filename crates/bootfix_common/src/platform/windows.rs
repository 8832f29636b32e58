//! Windows boot procedures (bootrec + BCD)

use super::{Artifacts, AutoRepair, BackupTarget, Platform, PlatformStrategy};
use crate::command_exec::Executor;
use crate::diagnostics::Issue;
use crate::error::{BootfixError, Result};
use tracing::{debug, warn};

const LIST_DISK_DRIVES: &str = "wmic diskdrive list brief";
const QUERY_BCD: &str = "bcdedit";
const FIX_MBR: &str = "bootrec /fixmbr";

/// Boot manager rebuild steps; all run regardless of earlier failures
const BOOT_MANAGER_STEPS: [&str; 3] = ["bootrec /fixboot", "bootrec /rebuildbcd", FIX_MBR];

#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsStrategy;

impl PlatformStrategy for WindowsStrategy {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn diagnose(&self, exec: &dyn Executor) -> Vec<Issue> {
        let mut issues = Vec::new();

        let listing = exec.execute(LIST_DISK_DRIVES);
        if listing.succeeded && !listing.output.trim().is_empty() {
            debug!("Disk drives:\n{}", listing.output.trim_end());
        }

        if !exec.execute(QUERY_BCD).succeeded {
            issues.push(Issue::new("Boot Configuration Data (BCD) issues detected"));
        }

        issues
    }

    fn backup_artifacts(&self, exec: &dyn Executor, target: &BackupTarget<'_>) -> Artifacts {
        let mut artifacts = Artifacts::new();
        if target.dry_run {
            return artifacts;
        }

        let bcd_path = target.artifact_path("bcd", "bak");
        let command = format!("bcdedit /export \"{}\"", bcd_path.display());
        let result = exec.execute(&command);
        if result.succeeded && bcd_path.exists() {
            artifacts.insert("bcd_backup", &bcd_path);
        } else {
            warn!("BCD export failed");
            artifacts.complete = false;
        }

        artifacts
    }

    fn repair_boot_record(&self, exec: &dyn Executor, _target_disk: &str) -> Result<()> {
        let result = exec.execute(FIX_MBR);
        if result.succeeded {
            Ok(())
        } else {
            Err(BootfixError::command_failed(FIX_MBR, &result.output))
        }
    }

    fn repair_boot_manager(&self, exec: &dyn Executor) -> Result<()> {
        let mut failed = Vec::new();
        for step in BOOT_MANAGER_STEPS {
            if !exec.execute(step).succeeded {
                failed.push(step.to_string());
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            warn!("Some repair operations failed");
            Err(BootfixError::PartialFailure { failed })
        }
    }

    fn auto_repair(&self) -> Option<AutoRepair> {
        Some(AutoRepair::BootManager)
    }
}
