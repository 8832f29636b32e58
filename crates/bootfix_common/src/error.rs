//! Error types for Bootfix.

use crate::platform::Platform;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BootfixError {
    #[error("Root/Admin privileges required")]
    PrivilegeDenied,

    #[error("Command '{command}' failed: {output}")]
    CommandFailed { command: String, output: String },

    #[error("{operation} is not available on {platform}")]
    UnsupportedPlatform {
        operation: String,
        platform: Platform,
    },

    #[error("{} of the repair steps failed: {}", .failed.len(), .failed.join(", "))]
    PartialFailure { failed: Vec<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BootfixError {
    /// Stable short code for reports and tests
    pub fn code(&self) -> &'static str {
        match self {
            BootfixError::PrivilegeDenied => "privilege_denied",
            BootfixError::CommandFailed { .. } => "command_failed",
            BootfixError::UnsupportedPlatform { .. } => "unsupported_platform",
            BootfixError::PartialFailure { .. } => "partial_failure",
            BootfixError::Io(_) => "io",
            BootfixError::Json(_) => "json",
        }
    }

    pub(crate) fn unsupported(operation: &str, platform: Platform) -> Self {
        BootfixError::UnsupportedPlatform {
            operation: operation.to_string(),
            platform,
        }
    }

    pub(crate) fn command_failed(command: &str, output: &str) -> Self {
        BootfixError::CommandFailed {
            command: command.to_string(),
            output: output.trim().to_string(),
        }
    }
}

/// Result type alias for bootfix operations
pub type Result<T> = std::result::Result<T, BootfixError>;
