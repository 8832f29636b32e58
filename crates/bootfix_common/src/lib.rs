//! Bootfix Common - boot diagnosis and repair core
//!
//! Detects privileges, picks the platform's boot procedures, takes a
//! backup before auto-fix repairs, and reports what each multi-step
//! procedure achieved. External tools (grub-install, bootrec, bcdedit, ...)
//! are only invoked and judged by exit status and output.

pub mod backup;
pub mod command_exec;
pub mod diagnostics;
pub mod error;
pub mod install;
pub mod orchestrator;
pub mod platform;
pub mod privilege;
pub mod session;

pub use backup::{BackupKind, BackupManager, BackupRecord, BackupStatus};
pub use command_exec::{CommandResult, Executor, ScriptedExecutor, SystemExecutor};
pub use diagnostics::{DiagnosticReport, Issue};
pub use error::{BootfixError, Result};
pub use orchestrator::{AutoFixReport, BootFixer, Operation, Outcome};
pub use platform::{AutoRepair, Platform, PlatformStrategy};
pub use privilege::{FixedPrivilege, PrivilegeGate, SystemPrivilegeGate};
pub use session::{BootPaths, SessionConfig};
