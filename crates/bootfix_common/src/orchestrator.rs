//! Operation dispatcher
//!
//! `BootFixer` owns the session and its collaborators and routes one
//! requested operation to the matching procedure:
//! 1. Gate mutating procedures on elevated privileges
//! 2. Hand platform specifics to the `PlatformStrategy`
//! 3. Take a backup before auto-fix repairs
//! 4. Log and return the aggregated outcome

use crate::backup::{BackupKind, BackupManager};
use crate::command_exec::{Executor, SystemExecutor};
use crate::diagnostics::{run_diagnostics, DiagnosticReport};
use crate::error::{BootfixError, Result};
use crate::install;
use crate::platform::{strategy_for, AutoRepair, PlatformStrategy};
use crate::privilege::{PrivilegeGate, SystemPrivilegeGate};
use crate::session::SessionConfig;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// One top-level operation per invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Install,
    Diagnose,
    Backup,
    RepairMbr { target_disk: String },
    RepairGrub { target_disk: String },
    RepairWindowsBoot,
    AutoFix,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Install => "install",
            Operation::Diagnose => "diagnose",
            Operation::Backup => "backup",
            Operation::RepairMbr { .. } => "repair-mbr",
            Operation::RepairGrub { .. } => "repair-grub",
            Operation::RepairWindowsBoot => "repair-windows-boot",
            Operation::AutoFix => "auto-fix",
        }
    }
}

/// What a successful operation produced
#[derive(Debug)]
pub enum Outcome {
    Installed(PathBuf),
    Diagnosed(DiagnosticReport),
    BackedUp(PathBuf),
    Repaired,
    AutoFixed(AutoFixReport),
}

/// Auto-fix is "attempted", not "succeeded"; the parts are kept here
#[derive(Debug)]
pub struct AutoFixReport {
    /// Record path, `None` if the backup could not be written
    pub backup: Option<PathBuf>,
    pub diagnostics: DiagnosticReport,
    /// `None` when the platform has no repair procedure
    pub repair: Option<Result<()>>,
}

impl AutoFixReport {
    pub fn repair_succeeded(&self) -> bool {
        matches!(self.repair, Some(Ok(())))
    }
}

/// Whether a procedure still has to consult the privilege gate
#[derive(Debug, Clone, Copy)]
enum Gate {
    Check,
    /// Caller already passed the gate (auto-fix)
    Granted,
}

pub struct BootFixer<'a> {
    config: SessionConfig,
    exec: Box<dyn Executor + 'a>,
    privileges: Box<dyn PrivilegeGate + 'a>,
    strategy: Box<dyn PlatformStrategy + 'a>,
}

impl BootFixer<'static> {
    /// Dispatcher wired to the real system
    pub fn new(config: SessionConfig) -> Self {
        let exec = SystemExecutor::new(config.verbose, config.dry_run);
        let strategy = strategy_for(&config);
        Self {
            config,
            exec: Box::new(exec),
            privileges: Box::new(SystemPrivilegeGate),
            strategy,
        }
    }
}

impl<'a> BootFixer<'a> {
    /// Dispatcher with injected collaborators
    pub fn with_parts(
        config: SessionConfig,
        exec: impl Executor + 'a,
        privileges: impl PrivilegeGate + 'a,
        strategy: impl PlatformStrategy + 'a,
    ) -> Self {
        Self {
            config,
            exec: Box::new(exec),
            privileges: Box::new(privileges),
            strategy: Box::new(strategy),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Route one operation
    pub fn run(&self, operation: &Operation) -> Result<Outcome> {
        match operation {
            Operation::Install => self.install().map(Outcome::Installed),
            Operation::Diagnose => Ok(Outcome::Diagnosed(self.diagnose())),
            Operation::Backup => self.create_backup(BackupKind::Full).map(Outcome::BackedUp),
            Operation::RepairMbr { target_disk } => {
                self.repair_mbr(target_disk).map(|()| Outcome::Repaired)
            }
            Operation::RepairGrub { target_disk } => {
                self.repair_grub(target_disk).map(|()| Outcome::Repaired)
            }
            Operation::RepairWindowsBoot => self.repair_windows_boot().map(|()| Outcome::Repaired),
            Operation::AutoFix => self.auto_fix().map(Outcome::AutoFixed),
        }
    }

    pub fn install(&self) -> Result<PathBuf> {
        install::install(&self.config)
    }

    pub fn diagnose(&self) -> DiagnosticReport {
        run_diagnostics(self.strategy.as_ref(), self.exec.as_ref())
    }

    pub fn create_backup(&self, kind: BackupKind) -> Result<PathBuf> {
        BackupManager::new(&self.config, self.strategy.as_ref(), self.exec.as_ref())
            .create_backup(kind)
    }

    pub fn repair_mbr(&self, target_disk: &str) -> Result<()> {
        info!("Repairing MBR on {}...", target_disk);
        self.require_privileges()?;
        let result = self
            .strategy
            .repair_boot_record(self.exec.as_ref(), target_disk);
        Self::report("MBR repair", result)
    }

    pub fn repair_grub(&self, target_disk: &str) -> Result<()> {
        self.grub_procedure(target_disk, Gate::Check)
    }

    pub fn repair_windows_boot(&self) -> Result<()> {
        self.boot_manager_procedure(Gate::Check)
    }

    /// Backup, diagnose, repair; no rollback
    ///
    /// Only a privilege denial is an error. Backup and repair failures are
    /// logged and carried in the report.
    pub fn auto_fix(&self) -> Result<AutoFixReport> {
        info!("Starting automatic repair...");
        self.require_privileges()?;

        let backup = match self.create_backup(BackupKind::AutoFix) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Backup before repair failed: {}", e);
                None
            }
        };

        // Informational at this stage; repair runs regardless
        let diagnostics = self.diagnose();

        let repair = match self.strategy.auto_repair() {
            Some(AutoRepair::BootloaderConfig) => {
                Some(self.grub_procedure(&self.config.target_disk, Gate::Granted))
            }
            Some(AutoRepair::BootManager) => Some(self.boot_manager_procedure(Gate::Granted)),
            None => {
                info!(
                    "No automatic repair available for {}",
                    self.strategy.platform()
                );
                None
            }
        };

        info!("Automatic repair completed");
        Ok(AutoFixReport {
            backup,
            diagnostics,
            repair,
        })
    }

    fn grub_procedure(&self, target_disk: &str, gate: Gate) -> Result<()> {
        info!("Repairing GRUB on {}...", target_disk);
        self.pass_gate(gate)?;
        let result = self
            .strategy
            .repair_bootloader_config(self.exec.as_ref(), target_disk);
        Self::report("GRUB repair", result)
    }

    fn boot_manager_procedure(&self, gate: Gate) -> Result<()> {
        info!("Repairing Windows Boot Manager...");
        self.pass_gate(gate)?;
        let result = self.strategy.repair_boot_manager(self.exec.as_ref());
        Self::report("Windows boot repair", result)
    }

    fn pass_gate(&self, gate: Gate) -> Result<()> {
        match gate {
            Gate::Check => self.require_privileges(),
            Gate::Granted => Ok(()),
        }
    }

    fn require_privileges(&self) -> Result<()> {
        if self.privileges.has_elevated_privileges() {
            Ok(())
        } else {
            error!("Root/Admin privileges required");
            Err(BootfixError::PrivilegeDenied)
        }
    }

    fn report(label: &str, result: Result<()>) -> Result<()> {
        match &result {
            Ok(()) => info!("{} completed", label),
            Err(e) => error!("{} failed: {}", label, e),
        }
        result
    }
}
