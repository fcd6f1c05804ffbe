use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for sff2fasta
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No .sff files found in input directory")]
    NoFilesFound,

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Converter '{0}' not found")]
    DependencyNotFound(String),

    #[error("Failed to start converter '{0}': {1}")]
    CommandStart(String, io::Error),

    #[error("Failed to wait for converter '{0}': {1}")]
    CommandWait(String, io::Error),

    #[error("Expected output file missing: {0}")]
    OutputMissing(PathBuf),

    #[error("Run interrupted")]
    Interrupted,

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for sff2fasta operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Creates a `CommandStart` error for the given converter. Failure to launch a
/// converter is the only spawn-time condition treated as an error; a completed
/// wait is a success regardless of the reported exit code.
pub fn command_start_error(converter: &str, e: io::Error) -> CoreError {
    CoreError::CommandStart(converter.to_string(), e)
}

/// Creates a `CommandWait` error for the given converter.
pub fn command_wait_error(converter: &str, e: io::Error) -> CoreError {
    CoreError::CommandWait(converter.to_string(), e)
}
