use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// Sync failures inside a pass never change the exit code; only startup
/// problems (bad configuration, unreadable store) do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (configuration, store, client construction)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Named failures of the readiness pipeline.
///
/// Tracker transport failures have their own taxonomy
/// (see `adapters::outbound::network::TrackerError`).
#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("Failed to decode snapshot manifest {key}\nDetails: {details}")]
    ManifestDecode { key: String, details: String },

    #[error("No result files found under {prefix}")]
    NoResultFiles { prefix: String },

    #[error("Failed to parse result file {key}\nDetails: {details}")]
    ResultFileParse { key: String, details: String },

    #[error("Invalid configuration: {message}\n\n💡 Hint: {hint}")]
    InvalidConfig { message: String, hint: String },

    #[error("Failed to access store file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    StoreIo { path: PathBuf, details: String },

    #[error("Snapshot already exists: {name}")]
    DuplicateSnapshot { name: String },

    #[error("Snapshot not found for id {id}")]
    UnknownSnapshotId { id: i64 },
}
