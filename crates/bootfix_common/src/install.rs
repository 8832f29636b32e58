//! Install marker
//!
//! `--install` prepares the backup directory and writes a small JSON
//! config. Nothing else reads it back; re-running simply overwrites it.

use crate::error::Result;
use crate::session::SessionConfig;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallConfig {
    pub version: String,
    /// RFC 3339 local time of the install
    pub installed: String,
    pub backup_dir: String,
}

impl InstallConfig {
    pub fn for_session(config: &SessionConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            installed: Local::now().to_rfc3339(),
            backup_dir: config.backup_dir.display().to_string(),
        }
    }
}

/// Create the backup directory and write the config file
pub fn install(config: &SessionConfig) -> Result<PathBuf> {
    info!("Installing bootfix...");

    fs::create_dir_all(&config.backup_dir)?;
    if let Some(parent) = config.config_file.parent() {
        fs::create_dir_all(parent)?;
    }

    let install_config = InstallConfig::for_session(config);
    fs::write(
        &config.config_file,
        serde_json::to_string_pretty(&install_config)?,
    )?;

    info!("Installation completed successfully");
    info!("Config file: {}", config.config_file.display());
    info!("Backup directory: {}", config.backup_dir.display());

    Ok(config.config_file.clone())
}
