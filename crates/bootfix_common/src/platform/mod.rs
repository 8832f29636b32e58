//! Platform detection and per-platform boot procedures
//!
//! Every OS-specific command string lives behind `PlatformStrategy`. The
//! dispatcher only ever talks to the trait, so it stays platform-agnostic
//! and can be driven by a mock strategy in tests.

pub mod linux;
pub mod unsupported;
pub mod windows;

pub use linux::LinuxStrategy;
pub use unsupported::UnsupportedStrategy;
pub use windows::WindowsStrategy;

use crate::command_exec::Executor;
use crate::diagnostics::Issue;
use crate::error::{BootfixError, Result};
use crate::session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Linux,
    Windows,
    Other,
}

impl Platform {
    /// Platform this binary is running on
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "Linux",
            Platform::Windows => "Windows",
            Platform::Other => "Other",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and under which name backup artifacts are written
#[derive(Debug, Clone, Copy)]
pub struct BackupTarget<'a> {
    pub dir: &'a Path,
    pub timestamp: &'a str,
    pub target_disk: &'a str,
    pub dry_run: bool,
}

impl BackupTarget<'_> {
    /// `<dir>/<prefix>_<timestamp>.<ext>`
    pub fn artifact_path(&self, prefix: &str, ext: &str) -> PathBuf {
        self.dir
            .join(format!("{}_{}.{}", prefix, self.timestamp, ext))
    }
}

/// Repair procedure auto-fix runs for a platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoRepair {
    /// Reinstall the bootloader and regenerate its config on the session disk
    BootloaderConfig,
    /// Rebuild the boot manager
    BootManager,
}

/// Artifact entries gathered during a backup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// Logical name -> path
    pub entries: BTreeMap<String, String>,
    /// False when any artifact step failed
    pub complete: bool,
}

impl Artifacts {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            complete: true,
        }
    }

    pub fn insert(&mut self, name: &str, path: &Path) {
        self.entries
            .insert(name.to_string(), path.display().to_string());
    }
}

impl Default for Artifacts {
    fn default() -> Self {
        Self::new()
    }
}

/// Boot procedures for one platform family
///
/// Procedures never check privileges themselves; the dispatcher gates
/// them before calling in.
pub trait PlatformStrategy {
    fn platform(&self) -> Platform;

    /// Read-only check battery; returns every issue found
    fn diagnose(&self, exec: &dyn Executor) -> Vec<Issue>;

    /// Best-effort snapshot of boot metadata; never fails
    fn backup_artifacts(&self, exec: &dyn Executor, target: &BackupTarget<'_>) -> Artifacts;

    /// Repair the boot record on `target_disk`
    fn repair_boot_record(&self, exec: &dyn Executor, target_disk: &str) -> Result<()>;

    /// Reinstall the bootloader and regenerate its config
    fn repair_bootloader_config(&self, _exec: &dyn Executor, _target_disk: &str) -> Result<()> {
        Err(BootfixError::unsupported("GRUB repair", self.platform()))
    }

    /// Rebuild the platform boot manager
    fn repair_boot_manager(&self, _exec: &dyn Executor) -> Result<()> {
        Err(BootfixError::unsupported("Windows boot repair", self.platform()))
    }

    /// Procedure auto-fix runs, `None` when the platform has none
    fn auto_repair(&self) -> Option<AutoRepair> {
        None
    }
}

impl<S: PlatformStrategy + ?Sized> PlatformStrategy for &S {
    fn platform(&self) -> Platform {
        (**self).platform()
    }

    fn diagnose(&self, exec: &dyn Executor) -> Vec<Issue> {
        (**self).diagnose(exec)
    }

    fn backup_artifacts(&self, exec: &dyn Executor, target: &BackupTarget<'_>) -> Artifacts {
        (**self).backup_artifacts(exec, target)
    }

    fn repair_boot_record(&self, exec: &dyn Executor, target_disk: &str) -> Result<()> {
        (**self).repair_boot_record(exec, target_disk)
    }

    fn repair_bootloader_config(&self, exec: &dyn Executor, target_disk: &str) -> Result<()> {
        (**self).repair_bootloader_config(exec, target_disk)
    }

    fn repair_boot_manager(&self, exec: &dyn Executor) -> Result<()> {
        (**self).repair_boot_manager(exec)
    }

    fn auto_repair(&self) -> Option<AutoRepair> {
        (**self).auto_repair()
    }
}

impl<S: PlatformStrategy + ?Sized> PlatformStrategy for Box<S> {
    fn platform(&self) -> Platform {
        (**self).platform()
    }

    fn diagnose(&self, exec: &dyn Executor) -> Vec<Issue> {
        (**self).diagnose(exec)
    }

    fn backup_artifacts(&self, exec: &dyn Executor, target: &BackupTarget<'_>) -> Artifacts {
        (**self).backup_artifacts(exec, target)
    }

    fn repair_boot_record(&self, exec: &dyn Executor, target_disk: &str) -> Result<()> {
        (**self).repair_boot_record(exec, target_disk)
    }

    fn repair_bootloader_config(&self, exec: &dyn Executor, target_disk: &str) -> Result<()> {
        (**self).repair_bootloader_config(exec, target_disk)
    }

    fn repair_boot_manager(&self, exec: &dyn Executor) -> Result<()> {
        (**self).repair_boot_manager(exec)
    }

    fn auto_repair(&self) -> Option<AutoRepair> {
        (**self).auto_repair()
    }
}

/// Strategy matching the session's platform
pub fn strategy_for(config: &SessionConfig) -> Box<dyn PlatformStrategy> {
    match config.platform {
        Platform::Linux => Box::new(LinuxStrategy::new(config.boot_paths.clone())),
        Platform::Windows => Box::new(WindowsStrategy),
        Platform::Other => Box::new(UnsupportedStrategy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_display() {
        assert_eq!(Platform::Linux.to_string(), "Linux");
        assert_eq!(Platform::Windows.to_string(), "Windows");
        assert_eq!(Platform::Other.to_string(), "Other");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_current_platform_linux() {
        assert_eq!(Platform::current(), Platform::Linux);
    }

    #[test]
    fn test_strategy_for_follows_config() {
        for platform in [Platform::Linux, Platform::Windows, Platform::Other] {
            let config = SessionConfig::new(false, true).with_platform(platform);
            assert_eq!(strategy_for(&config).platform(), platform);
        }
    }

    #[test]
    fn test_artifact_path_naming() {
        let dir = PathBuf::from("/backups");
        let target = BackupTarget {
            dir: &dir,
            timestamp: "20250101_120000",
            target_disk: "/dev/sda",
            dry_run: false,
        };
        assert_eq!(
            target.artifact_path("mbr", "bin"),
            PathBuf::from("/backups/mbr_20250101_120000.bin")
        );
    }

    #[test]
    fn test_default_artifacts_start_complete() {
        let artifacts = Artifacts::default();
        assert!(artifacts.complete);
        assert!(artifacts.entries.is_empty());
        assert_eq!(artifacts, Artifacts::new());
    }
}
