//! Error types and exit codes for annuaire

use std::process::ExitCode;
use thiserror::Error;

/// Main error type for annuaire operations
#[derive(Error, Debug)]
pub enum AnnuaireError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("No usable contacts in input")]
    NoInput,

    #[error("Failed to parse vCard input: {message}")]
    ParseFailure { message: String },

    #[error("Failed to write output: {message}")]
    WriteFailure { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnnuaireError {
    /// Convert error to its process exit code:
    /// - 0: Success
    /// - 1: File not found / IO error
    /// - 2: No usable input
    /// - 3: Parse failure
    /// - 4: Write failure
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::FileNotFound { .. } => ExitCode::from(1),
            Self::Io(_) => ExitCode::from(1),
            Self::NoInput => ExitCode::from(2),
            Self::ParseFailure { .. } => ExitCode::from(3),
            Self::WriteFailure { .. } => ExitCode::from(4),
        }
    }
}

/// Result type alias for annuaire operations
pub type Result<T> = std::result::Result<T, AnnuaireError>;
