//! Command execution layer
//!
//! Runs external boot tools through the platform shell and reports a
//! `CommandResult`. Execution fails soft: spawn errors, non-zero exits and
//! timeouts all come back as `succeeded == false` with diagnostic text.
//!
//! In dry-run mode nothing is spawned; the intent is logged and the call
//! reports success.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Default timeout for external commands
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// How often a running child is polled for exit
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Outcome of a single external command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// Exit status was zero and the command finished in time
    pub succeeded: bool,
    /// stdout on success, stderr or error text on failure
    pub output: String,
}

impl CommandResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            output: output.into(),
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            output: output.into(),
        }
    }
}

/// Anything that can run a shell command line
pub trait Executor {
    fn execute(&self, command: &str) -> CommandResult;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute(&self, command: &str) -> CommandResult {
        (**self).execute(command)
    }
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn execute(&self, command: &str) -> CommandResult {
        (**self).execute(command)
    }
}

/// Executor backed by real processes
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    verbose: bool,
    dry_run: bool,
    timeout: Duration,
}

impl SystemExecutor {
    pub fn new(verbose: bool, dry_run: bool) -> Self {
        Self {
            verbose,
            dry_run,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[cfg(windows)]
    fn shell(command: &str) -> Command {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }

    #[cfg(not(windows))]
    fn shell(command: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }

    /// Spawn the command and wait for it, killing it past the timeout
    fn run(&self, command: &str) -> io::Result<CommandResult> {
        let mut child = Self::shell(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "stdout was not captured"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "stderr was not captured"))?;

        // Drain both pipes concurrently so a chatty child can't block on a full pipe
        let stdout_thread = thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stdout.read_to_end(&mut buf);
            buf
        });
        let stderr_thread = thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf);
            buf
        });

        let start = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if start.elapsed() > self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                // Reader threads are left to finish on their own; a grandchild
                // may still hold the pipes open.
                return Ok(CommandResult::failed(format!(
                    "Command timed out after {}s",
                    self.timeout.as_secs()
                )));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout_bytes = stdout_thread.join().unwrap_or_default();
        let stderr_bytes = stderr_thread.join().unwrap_or_default();

        if status.success() {
            Ok(CommandResult::ok(String::from_utf8_lossy(&stdout_bytes)))
        } else {
            let stderr = String::from_utf8_lossy(&stderr_bytes).to_string();
            let output = if stderr.trim().is_empty() {
                format!("exit status {}", status.code().unwrap_or(-1))
            } else {
                stderr
            };
            Ok(CommandResult::failed(output))
        }
    }
}

impl Executor for SystemExecutor {
    fn execute(&self, command: &str) -> CommandResult {
        if self.dry_run {
            info!("[DRY-RUN] Would execute: {}", command);
            return CommandResult::ok("");
        }

        if self.verbose {
            debug!("Executing: {}", command);
        }

        match self.run(command) {
            Ok(result) => {
                if !result.succeeded {
                    error!("Command failed: {}", result.output.trim());
                }
                result
            }
            Err(e) => {
                error!("Error executing command: {}", e);
                CommandResult::failed(e.to_string())
            }
        }
    }
}

/// Executor that never spawns anything
///
/// Answers each command from a list of substring rules (first match wins,
/// otherwise the default) and records every command it was asked to run.
#[derive(Debug)]
pub struct ScriptedExecutor {
    rules: Vec<(String, CommandResult)>,
    default: CommandResult,
    calls: RefCell<Vec<String>>,
}

impl ScriptedExecutor {
    /// Every unmatched command succeeds
    pub fn succeeding() -> Self {
        Self {
            rules: Vec::new(),
            default: CommandResult::ok(""),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Every unmatched command fails
    pub fn failing() -> Self {
        Self {
            default: CommandResult::failed("scripted failure"),
            ..Self::succeeding()
        }
    }

    /// Commands containing `pattern` succeed or fail as given
    pub fn respond(self, pattern: &str, succeeded: bool) -> Self {
        let result = if succeeded {
            CommandResult::ok("")
        } else {
            CommandResult::failed(format!("{}: scripted failure", pattern))
        };
        self.respond_with(pattern, result)
    }

    pub fn respond_with(mut self, pattern: &str, result: CommandResult) -> Self {
        self.rules.push((pattern.to_string(), result));
        self
    }

    /// Commands received so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Executor for ScriptedExecutor {
    fn execute(&self, command: &str) -> CommandResult {
        self.calls.borrow_mut().push(command.to_string());
        self.rules
            .iter()
            .find(|(pattern, _)| command.contains(pattern.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| self.default.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_never_spawns() {
        let exec = SystemExecutor::new(false, true);
        // Would fail loudly if it actually ran
        let result = exec.execute("exit 42");
        assert!(result.succeeded);
        assert!(result.output.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_success_captures_stdout() {
        let exec = SystemExecutor::new(true, false);
        let result = exec.execute("echo bootfix-ok");
        assert!(result.succeeded);
        assert_eq!(result.output.trim(), "bootfix-ok");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_returns_stderr() {
        let exec = SystemExecutor::new(false, false);
        let result = exec.execute("echo broken >&2; exit 3");
        assert!(!result.succeeded);
        assert_eq!(result.output.trim(), "broken");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_without_stderr_reports_code() {
        let exec = SystemExecutor::new(false, false);
        let result = exec.execute("exit 7");
        assert!(!result.succeeded);
        assert_eq!(result.output, "exit status 7");
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_is_a_failure() {
        let exec = SystemExecutor::new(false, false).with_timeout(Duration::from_millis(200));
        let start = Instant::now();
        let result = exec.execute("sleep 5");
        assert!(!result.succeeded);
        assert!(result.output.contains("timed out"));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_scripted_first_rule_wins() {
        let exec = ScriptedExecutor::succeeding()
            .respond("update-grub", false)
            .respond("update", true);
        assert!(!exec.execute("update-grub").succeeded);
        assert!(exec.execute("apt update").succeeded);
        assert!(exec.execute("lsblk").succeeded);
        assert_eq!(exec.calls(), vec!["update-grub", "apt update", "lsblk"]);
    }

    #[test]
    fn test_scripted_failing_default() {
        let exec = ScriptedExecutor::failing().respond_with("lsblk", CommandResult::ok("sda"));
        assert_eq!(exec.execute("lsblk").output, "sda");
        assert!(!exec.execute("bcdedit").succeeded);
        assert_eq!(exec.call_count(), 2);
    }
}
