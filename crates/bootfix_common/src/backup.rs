//! Backup manager
//!
//! Snapshots boot metadata before anything mutating runs. Artifact steps
//! are best-effort; the JSON metadata record is always written, dry-run
//! included, so it reflects intent rather than guaranteed artifacts.
//!
//! Records are create-only: never rewritten, never pruned.

use crate::command_exec::Executor;
use crate::error::Result;
use crate::platform::{BackupTarget, Platform, PlatformStrategy};
use crate::session::SessionConfig;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Second-granularity stamp shared by the record and its file names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Why a backup was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupKind {
    /// Explicit operator request
    Full,
    /// Taken by auto-fix before repairing
    AutoFix,
}

impl BackupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupKind::Full => "full",
            BackupKind::AutoFix => "auto_fix",
        }
    }
}

impl std::fmt::Display for BackupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupStatus {
    /// Every attempted artifact step succeeded
    Created,
    /// At least one artifact step failed
    Partial,
}

/// Metadata written as `backup_<kind>_<timestamp>.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub timestamp: String,
    pub os_type: Platform,
    pub backup_type: BackupKind,
    pub status: BackupStatus,
    /// Logical artifact name -> path, stored as top-level keys
    #[serde(flatten)]
    pub artifacts: BTreeMap<String, String>,
}

impl BackupRecord {
    /// File name this record is stored under
    pub fn file_name(&self) -> String {
        format!("backup_{}_{}.json", self.backup_type, self.timestamp)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

pub struct BackupManager<'a> {
    config: &'a SessionConfig,
    strategy: &'a dyn PlatformStrategy,
    exec: &'a dyn Executor,
}

impl<'a> BackupManager<'a> {
    pub fn new(
        config: &'a SessionConfig,
        strategy: &'a dyn PlatformStrategy,
        exec: &'a dyn Executor,
    ) -> Self {
        Self {
            config,
            strategy,
            exec,
        }
    }

    /// Snapshot boot metadata and return the record path
    ///
    /// Only directory creation and the record write itself can fail.
    pub fn create_backup(&self, kind: BackupKind) -> Result<PathBuf> {
        info!("Creating {} backup...", kind);

        fs::create_dir_all(&self.config.backup_dir)?;

        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let target = BackupTarget {
            dir: &self.config.backup_dir,
            timestamp: &timestamp,
            target_disk: &self.config.target_disk,
            dry_run: self.config.dry_run,
        };
        let artifacts = self.strategy.backup_artifacts(self.exec, &target);

        let record = BackupRecord {
            timestamp: timestamp.clone(),
            os_type: self.strategy.platform(),
            backup_type: kind,
            status: if artifacts.complete {
                BackupStatus::Created
            } else {
                BackupStatus::Partial
            },
            artifacts: artifacts.entries,
        };

        let path = self.config.backup_dir.join(record.file_name());
        fs::write(&path, serde_json::to_string_pretty(&record)?)?;

        info!("Backup created: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_exec::ScriptedExecutor;
    use crate::platform::{UnsupportedStrategy, WindowsStrategy};
    use tempfile::TempDir;

    #[test]
    fn test_record_json_layout() {
        let mut artifacts = BTreeMap::new();
        artifacts.insert("mbr_backup".to_string(), "/b/mbr_1.bin".to_string());
        let record = BackupRecord {
            timestamp: "20250101_120000".to_string(),
            os_type: Platform::Linux,
            backup_type: BackupKind::AutoFix,
            status: BackupStatus::Created,
            artifacts,
        };

        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(json["timestamp"], "20250101_120000");
        assert_eq!(json["os_type"], "Linux");
        assert_eq!(json["backup_type"], "auto_fix");
        assert_eq!(json["status"], "created");
        assert_eq!(json["mbr_backup"], "/b/mbr_1.bin");
        assert_eq!(record.file_name(), "backup_auto_fix_20250101_120000.json");
    }

    #[test]
    fn test_creates_missing_backup_dir() {
        let dir = TempDir::new().unwrap();
        let backup_dir = dir.path().join("nested/backups");
        let config = SessionConfig::new(false, true)
            .with_platform(Platform::Other)
            .with_backup_dir(&backup_dir);
        let exec = ScriptedExecutor::succeeding();

        let path = BackupManager::new(&config, &UnsupportedStrategy, &exec)
            .create_backup(BackupKind::Full)
            .unwrap();
        assert!(path.starts_with(&backup_dir));
        assert!(path.exists());
    }

    #[test]
    fn test_failed_artifact_marks_record_partial() {
        let dir = TempDir::new().unwrap();
        let config = SessionConfig::new(false, false)
            .with_platform(Platform::Windows)
            .with_backup_dir(dir.path());
        let exec = ScriptedExecutor::failing();

        let path = BackupManager::new(&config, &WindowsStrategy, &exec)
            .create_backup(BackupKind::Full)
            .unwrap();
        let record = BackupRecord::load(&path).unwrap();
        assert_eq!(record.status, BackupStatus::Partial);
        assert!(record.artifacts.is_empty());
        assert_eq!(record.os_type, Platform::Windows);
    }

    #[test]
    fn test_unwritable_backup_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a dir").unwrap();
        let config = SessionConfig::new(false, true)
            .with_platform(Platform::Other)
            .with_backup_dir(blocker.join("backups"));
        let exec = ScriptedExecutor::succeeding();

        let err = BackupManager::new(&config, &UnsupportedStrategy, &exec)
            .create_backup(BackupKind::Full)
            .unwrap_err();
        assert_eq!(err.code(), "io");
    }
}
