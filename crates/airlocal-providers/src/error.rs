//! Error types for airlocal-providers

use thiserror::Error;

/// Result type alias using airlocal-providers' Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Required tool is not installed
    #[error("{tool} not found in PATH")]
    ToolNotFound { tool: String },

    /// External command exited unsuccessfully
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error(transparent)]
    Core(#[from] airlocal_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Build a command failure from a finished process
    pub fn command_failed(command: impl Into<String>, output: &std::process::Output) -> Self {
        let status = match output.status.code() {
            Some(code) => format!("status {}", code),
            None => "a signal".to_string(),
        };
        Self::CommandFailed {
            command: command.into(),
            status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}
