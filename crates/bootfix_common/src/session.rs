//! Session configuration
//!
//! One `SessionConfig` is built per invocation and handed to the
//! dispatcher. Every path the core touches comes from here, so tests can
//! point the whole run at a temporary directory.

use crate::platform::Platform;
use std::path::PathBuf;

/// Default disk for boot record operations
pub const DEFAULT_TARGET_DISK: &str = "/dev/sda";

/// Backup directory name under the home directory
const BACKUP_DIR_NAME: &str = ".bootfix_backups";

/// Install config file name under the home directory
const CONFIG_FILE_NAME: &str = ".bootfix_config.json";

/// Well-known boot locations consulted by diagnostics and backups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootPaths {
    /// Bootloader config candidates, in preference order
    pub grub_configs: Vec<PathBuf>,
    /// Mount point expected to hold the boot partition
    pub boot_mount: PathBuf,
    /// Where config regeneration writes its output
    pub grub_config_output: PathBuf,
}

impl Default for BootPaths {
    fn default() -> Self {
        Self {
            grub_configs: vec![
                PathBuf::from("/boot/grub/grub.cfg"),
                PathBuf::from("/boot/grub2/grub.cfg"),
            ],
            boot_mount: PathBuf::from("/boot"),
            grub_config_output: PathBuf::from("/boot/grub/grub.cfg"),
        }
    }
}

impl BootPaths {
    /// First bootloader config that exists on disk
    pub fn existing_grub_config(&self) -> Option<&PathBuf> {
        self.grub_configs.iter().find(|p| p.exists())
    }
}

/// Per-invocation settings
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub verbose: bool,
    pub dry_run: bool,
    pub platform: Platform,
    pub backup_dir: PathBuf,
    pub config_file: PathBuf,
    pub target_disk: String,
    pub boot_paths: BootPaths,
}

impl SessionConfig {
    /// Settings for the running host, with default paths
    pub fn new(verbose: bool, dry_run: bool) -> Self {
        Self {
            verbose,
            dry_run,
            platform: Platform::current(),
            backup_dir: default_backup_dir(),
            config_file: default_config_file(),
            target_disk: DEFAULT_TARGET_DISK.to_string(),
            boot_paths: BootPaths::default(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = dir.into();
        self
    }

    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = path.into();
        self
    }

    pub fn with_target_disk(mut self, disk: impl Into<String>) -> Self {
        self.target_disk = disk.into();
        self
    }

    pub fn with_boot_paths(mut self, paths: BootPaths) -> Self {
        self.boot_paths = paths;
        self
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Backup directory
///
/// Priority:
/// 1. $BOOTFIX_BACKUP_DIR (explicit override)
/// 2. ~/.bootfix_backups
pub fn default_backup_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BOOTFIX_BACKUP_DIR") {
        return PathBuf::from(dir);
    }
    home_dir().join(BACKUP_DIR_NAME)
}

/// Install config file
///
/// Priority:
/// 1. $BOOTFIX_CONFIG_FILE (explicit override)
/// 2. ~/.bootfix_config.json
pub fn default_config_file() -> PathBuf {
    if let Ok(path) = std::env::var("BOOTFIX_CONFIG_FILE") {
        return PathBuf::from(path);
    }
    home_dir().join(CONFIG_FILE_NAME)
}
