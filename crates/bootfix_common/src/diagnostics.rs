//! Diagnostics engine
//!
//! Runs the platform's read-only check battery and reports every issue
//! found. Checks never stop early; a partial picture is still useful.

use crate::command_exec::Executor;
use crate::platform::{Platform, PlatformStrategy};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One detected boot problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Issue(String);

impl Issue {
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of one diagnostic run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub platform: Platform,
    pub issues: Vec<Issue>,
}

impl DiagnosticReport {
    /// No issues were found
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_issue(&self, description: &str) -> bool {
        self.issues.iter().any(|i| i.as_str() == description)
    }
}

/// Run the platform battery and log the findings
pub fn run_diagnostics(strategy: &dyn PlatformStrategy, exec: &dyn Executor) -> DiagnosticReport {
    info!("Starting boot diagnostics...");
    info!("Checking disk configuration...");

    let issues = strategy.diagnose(exec);

    if issues.is_empty() {
        info!("No critical issues detected");
    } else {
        warn!("Issues detected:");
        for issue in &issues {
            warn!("  - {}", issue);
        }
    }

    DiagnosticReport {
        platform: strategy.platform(),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_exec::ScriptedExecutor;
    use crate::platform::UnsupportedStrategy;

    #[test]
    fn test_unsupported_platform_is_trivially_healthy() {
        let exec = ScriptedExecutor::failing();
        let report = run_diagnostics(&UnsupportedStrategy, &exec);
        assert!(report.is_healthy());
        assert_eq!(report.platform, Platform::Other);
        assert_eq!(exec.call_count(), 0);
    }

    #[test]
    fn test_issue_serializes_as_plain_string() {
        let issue = Issue::new("Boot partition not mounted");
        assert_eq!(
            serde_json::to_string(&issue).unwrap(),
            "\"Boot partition not mounted\""
        );
        assert_eq!(issue.to_string(), "Boot partition not mounted");
    }

    #[test]
    fn test_has_issue() {
        let report = DiagnosticReport {
            platform: Platform::Linux,
            issues: vec![Issue::new("GRUB configuration not found")],
        };
        assert!(!report.is_healthy());
        assert!(report.has_issue("GRUB configuration not found"));
        assert!(!report.has_issue("Boot partition not mounted"));
    }
}
