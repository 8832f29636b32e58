//! Platforms with no boot procedures
//!
//! Diagnostics are empty and every repair is refused without side effects.

use super::{Artifacts, BackupTarget, Platform, PlatformStrategy};
use crate::command_exec::Executor;
use crate::diagnostics::Issue;
use crate::error::{BootfixError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedStrategy;

impl PlatformStrategy for UnsupportedStrategy {
    fn platform(&self) -> Platform {
        Platform::Other
    }

    fn diagnose(&self, _exec: &dyn Executor) -> Vec<Issue> {
        Vec::new()
    }

    fn backup_artifacts(&self, _exec: &dyn Executor, _target: &BackupTarget<'_>) -> Artifacts {
        Artifacts::new()
    }

    fn repair_boot_record(&self, _exec: &dyn Executor, _target_disk: &str) -> Result<()> {
        Err(BootfixError::unsupported("MBR repair", Platform::Other))
    }
}
