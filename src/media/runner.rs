//! Testable external command execution.
//!
//! The `CommandExecutor` trait is the single seam through which ffmpeg
//! and ffprobe are invoked, enabling full testability without the tools
//! installed.

use crate::error::{DubError, Result};
use std::process::Command;

/// Trait for executing system commands.
///
/// Object-safe, Send + Sync for use in concurrent contexts.
/// Enables testability by allowing mock implementations.
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with arguments.
    ///
    /// Returns the stdout of the command on success.
    /// Returns an error if the command fails or is not found.
    fn execute(&self, command: &str, args: &[&str]) -> Result<String>;
}

/// Production command executor using std::process::Command.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(command).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DubError::ToolNotFound {
                    tool: command.to_string(),
                }
            } else {
                DubError::CommandFailed {
                    message: format!("Failed to execute {}: {}", command, e),
                }
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DubError::CommandFailed {
                message: format!(
                    "{} failed with status {:?}: {}",
                    command,
                    output.status.code(),
                    stderr.trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_captures_stdout() {
        let executor = SystemCommandExecutor::new();
        let out = executor.execute("echo", &["hello"]).unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn missing_tool_is_tool_not_found() {
        let executor = SystemCommandExecutor::new();
        let result = executor.execute("nonexistent-tool-xyz-12345", &[]);
        match result {
            Err(DubError::ToolNotFound { tool }) => {
                assert_eq!(tool, "nonexistent-tool-xyz-12345");
            }
            other => panic!("Expected ToolNotFound, got {:?}", other),
        }
    }

    #[test]
    fn nonzero_exit_is_command_failed() {
        let executor = SystemCommandExecutor::new();
        let result = executor.execute("false", &[]);
        assert!(matches!(result, Err(DubError::CommandFailed { .. })));
    }

    #[test]
    fn executor_is_object_safe() {
        let executor: Box<dyn CommandExecutor> = Box::new(SystemCommandExecutor::new());
        assert!(executor.execute("true", &[]).is_ok());
    }
}
