//! Linux boot procedures (GRUB + MBR)

use super::{Artifacts, AutoRepair, BackupTarget, Platform, PlatformStrategy};
use crate::command_exec::Executor;
use crate::diagnostics::Issue;
use crate::error::{BootfixError, Result};
use crate::session::BootPaths;
use tracing::{debug, error, warn};

const LIST_BLOCK_DEVICES: &str = "lsblk -o NAME,SIZE,TYPE,MOUNTPOINT";
const UPDATE_GRUB: &str = "update-grub";

#[derive(Debug, Clone, Default)]
pub struct LinuxStrategy {
    paths: BootPaths,
}

impl LinuxStrategy {
    pub fn new(paths: BootPaths) -> Self {
        Self { paths }
    }

    fn grub_install(target_disk: &str) -> String {
        format!("grub-install \"{}\"", target_disk)
    }

    fn grub_mkconfig(&self) -> String {
        format!("grub-mkconfig -o {}", self.paths.grub_config_output.display())
    }

    fn install_bootloader(&self, exec: &dyn Executor, target_disk: &str) -> Result<()> {
        let command = Self::grub_install(target_disk);
        let result = exec.execute(&command);
        if result.succeeded {
            Ok(())
        } else {
            Err(BootfixError::command_failed(&command, &result.output))
        }
    }

    /// update-grub, falling back to grub-mkconfig
    fn regenerate_config(&self, exec: &dyn Executor) -> Result<()> {
        if exec.execute(UPDATE_GRUB).succeeded {
            return Ok(());
        }

        debug!("{} failed, falling back to grub-mkconfig", UPDATE_GRUB);
        let command = self.grub_mkconfig();
        let result = exec.execute(&command);
        if result.succeeded {
            Ok(())
        } else {
            Err(BootfixError::command_failed(&command, &result.output))
        }
    }
}

impl PlatformStrategy for LinuxStrategy {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn diagnose(&self, exec: &dyn Executor) -> Vec<Issue> {
        let mut issues = Vec::new();

        // Informational only
        let listing = exec.execute(LIST_BLOCK_DEVICES);
        if listing.succeeded && !listing.output.trim().is_empty() {
            debug!("Block devices:\n{}", listing.output.trim_end());
        }

        if self.paths.existing_grub_config().is_none() {
            issues.push(Issue::new("GRUB configuration not found"));
        }

        let mount_check = format!("mount | grep {}", self.paths.boot_mount.display());
        if !exec.execute(&mount_check).succeeded {
            issues.push(Issue::new("Boot partition not mounted"));
        }

        issues
    }

    fn backup_artifacts(&self, exec: &dyn Executor, target: &BackupTarget<'_>) -> Artifacts {
        let mut artifacts = Artifacts::new();

        if !target.dry_run {
            let mbr_path = target.artifact_path("mbr", "bin");
            let command = format!(
                "dd if=\"{}\" of=\"{}\" bs=512 count=1",
                target.target_disk,
                mbr_path.display()
            );
            let result = exec.execute(&command);
            if result.succeeded && mbr_path.exists() {
                artifacts.insert("mbr_backup", &mbr_path);
            } else {
                warn!("Boot record backup of {} failed", target.target_disk);
                artifacts.complete = false;
            }
        }

        if let Some(grub_cfg) = self.paths.existing_grub_config() {
            artifacts.insert("grub_config", grub_cfg);
        }

        artifacts
    }

    fn repair_boot_record(&self, exec: &dyn Executor, target_disk: &str) -> Result<()> {
        self.install_bootloader(exec, target_disk)
    }

    fn repair_bootloader_config(&self, exec: &dyn Executor, target_disk: &str) -> Result<()> {
        if let Err(e) = self.install_bootloader(exec, target_disk) {
            error!("GRUB installation failed");
            return Err(e);
        }

        if let Err(e) = self.regenerate_config(exec) {
            error!("GRUB configuration update failed");
            return Err(e);
        }

        Ok(())
    }

    fn auto_repair(&self) -> Option<AutoRepair> {
        Some(AutoRepair::BootloaderConfig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_exec::ScriptedExecutor;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn paths_in(dir: &TempDir) -> BootPaths {
        BootPaths {
            grub_configs: vec![
                dir.path().join("boot/grub/grub.cfg"),
                dir.path().join("boot/grub2/grub.cfg"),
            ],
            boot_mount: PathBuf::from("/boot"),
            grub_config_output: dir.path().join("boot/grub/grub.cfg"),
        }
    }

    #[test]
    fn test_diagnose_reports_missing_config_and_mount() {
        let dir = TempDir::new().unwrap();
        let strategy = LinuxStrategy::new(paths_in(&dir));
        let exec = ScriptedExecutor::succeeding().respond("mount | grep /boot", false);

        let issues = strategy.diagnose(&exec);
        assert_eq!(
            issues,
            vec![
                Issue::new("GRUB configuration not found"),
                Issue::new("Boot partition not mounted"),
            ]
        );
        assert_eq!(exec.calls(), vec![LIST_BLOCK_DEVICES, "mount | grep /boot"]);
    }

    #[test]
    fn test_diagnose_block_listing_never_raises_issue() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        std::fs::create_dir_all(paths.grub_configs[1].parent().unwrap()).unwrap();
        std::fs::write(&paths.grub_configs[1], "menuentry 'Linux' {}").unwrap();

        let strategy = LinuxStrategy::new(paths);
        let exec = ScriptedExecutor::succeeding().respond("lsblk", false);
        assert!(strategy.diagnose(&exec).is_empty());
    }

    #[test]
    fn test_bootloader_config_fallback_path() {
        let dir = TempDir::new().unwrap();
        let strategy = LinuxStrategy::new(paths_in(&dir));
        let exec = ScriptedExecutor::succeeding().respond(UPDATE_GRUB, false);

        assert!(strategy.repair_bootloader_config(&exec, "/dev/sdb").is_ok());
        let calls = exec.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], "grub-install \"/dev/sdb\"");
        assert_eq!(calls[1], "update-grub");
        assert!(calls[2].starts_with("grub-mkconfig -o "));
    }

    #[test]
    fn test_bootloader_config_stops_when_install_fails() {
        let strategy = LinuxStrategy::default();
        let exec = ScriptedExecutor::succeeding().respond("grub-install", false);

        let err = strategy
            .repair_bootloader_config(&exec, "/dev/sda")
            .unwrap_err();
        assert_eq!(err.code(), "command_failed");
        assert_eq!(exec.calls(), vec!["grub-install \"/dev/sda\""]);
    }

    #[test]
    fn test_bootloader_config_fails_when_both_config_steps_fail() {
        let strategy = LinuxStrategy::default();
        let exec = ScriptedExecutor::succeeding()
            .respond(UPDATE_GRUB, false)
            .respond("grub-mkconfig", false);

        assert!(strategy.repair_bootloader_config(&exec, "/dev/sda").is_err());
        assert_eq!(exec.call_count(), 3);
    }

    #[test]
    fn test_primary_config_step_skips_fallback() {
        let strategy = LinuxStrategy::default();
        let exec = ScriptedExecutor::succeeding();

        assert!(strategy.repair_bootloader_config(&exec, "/dev/sda").is_ok());
        assert_eq!(exec.calls(), vec!["grub-install \"/dev/sda\"", "update-grub"]);
    }

    #[test]
    fn test_dry_run_backup_has_no_boot_record_artifact() {
        let dir = TempDir::new().unwrap();
        let strategy = LinuxStrategy::new(paths_in(&dir));
        let exec = ScriptedExecutor::succeeding();
        let target = BackupTarget {
            dir: dir.path(),
            timestamp: "20250101_000000",
            target_disk: "/dev/sda",
            dry_run: true,
        };

        let artifacts = strategy.backup_artifacts(&exec, &target);
        assert!(artifacts.entries.is_empty());
        assert!(artifacts.complete);
        assert_eq!(exec.call_count(), 0);
    }

    #[test]
    fn test_backup_skips_artifact_that_was_not_written() {
        let dir = TempDir::new().unwrap();
        let strategy = LinuxStrategy::new(paths_in(&dir));
        // dd "succeeds" but nothing lands on disk
        let exec = ScriptedExecutor::succeeding();
        let target = BackupTarget {
            dir: dir.path(),
            timestamp: "20250101_000000",
            target_disk: "/dev/sda",
            dry_run: false,
        };

        let artifacts = strategy.backup_artifacts(&exec, &target);
        assert!(!artifacts.entries.contains_key("mbr_backup"));
        assert!(!artifacts.complete);
        assert!(exec.calls()[0].starts_with("dd if=\"/dev/sda\" of="));
    }

    #[test]
    fn test_disk_path_is_quoted_in_commands() {
        let dir = TempDir::new().unwrap();
        let strategy = LinuxStrategy::new(paths_in(&dir));
        let exec = ScriptedExecutor::succeeding();
        let disk = "/dev/disk/by-label/boot disk";

        strategy.repair_boot_record(&exec, disk).unwrap();
        let target = BackupTarget {
            dir: dir.path(),
            timestamp: "20250101_000000",
            target_disk: disk,
            dry_run: false,
        };
        strategy.backup_artifacts(&exec, &target);

        let calls = exec.calls();
        assert_eq!(calls[0], "grub-install \"/dev/disk/by-label/boot disk\"");
        assert!(calls[1].starts_with("dd if=\"/dev/disk/by-label/boot disk\" of=\""));
    }
}
