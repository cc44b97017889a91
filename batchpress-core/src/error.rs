//! Error types for the batchpress-core library.
//!
//! Subprocess failures (probe, encoder) are fatal to the file that triggered
//! them; whether they abort the whole batch is decided by the caller via
//! `CoreConfig::fail_fast`. Missing fields inside probe output are never
//! errors here, they degrade to `None` or the `"UND"` sentinel during
//! descriptor construction.

use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for batchpress
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] std::io::Error),

    #[error("Command '{0}' failed with status {1}: {2}")]
    CommandFailed(String, ExitStatus, String),

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("Probe output error: {0}")]
    ProbeOutput(String),

    #[error("Preset file error: {0}")]
    PresetParse(String),

    #[error("No processable media files found")]
    NoFilesFound,

    #[error("Invalid path: {0}")]
    PathError(String),

    #[error("Selection input error: {0}")]
    SelectionInput(String),

    #[error("Interrupted before starting the next file")]
    Interrupted,

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for batchpress operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CommandStart` error for a tool that could not be spawned.
pub fn command_start_error(tool: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(tool.into(), err)
}

/// Builds a `CommandFailed` error for a tool that exited non-zero.
pub fn command_failed_error(
    tool: impl Into<String>,
    status: ExitStatus,
    stderr: String,
) -> CoreError {
    CoreError::CommandFailed(tool.into(), status, stderr)
}
